use std::borrow::Cow;
use std::io::{self, Write};

use logtally_types::{CodeStatistic, FieldRow};

/// Header of `statistics.csv`
pub const STATISTICS_HEADER: &str = "date,user,type,code,message,count";

/// Write every row tab-joined, one per line
pub fn write_all_lines<W: Write>(mut out: W, rows: &[FieldRow]) -> io::Result<()> {
    for row in rows {
        writeln!(out, "{}", row.to_tab_line())?;
    }
    out.flush()
}

/// Write the statistics table as CSV, header first
pub fn write_statistics<W: Write>(mut out: W, stats: &[CodeStatistic]) -> io::Result<()> {
    writeln!(out, "{}", STATISTICS_HEADER)?;
    for stat in stats {
        let fields: Vec<Cow<'_, str>> = stat.first.fields().into_iter().map(csv_field).collect();
        writeln!(out, "{},{}", fields.join(","), stat.count)?;
    }
    out.flush()
}

/// Quote a CSV field only when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
