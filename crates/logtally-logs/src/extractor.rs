use logtally_types::{FieldRow, LogicalRecord};

use crate::error::{Result, TallyError};

/// Minimum tab-delimited fields a record needs (date, user, type, code)
pub const MIN_FIELDS: usize = 4;

/// Split a record into its five kept columns.
///
/// Double tabs are collapsed once (three tabs become two), then the text is
/// split on tabs and positions 0, 1, 2, 3 and the last one are kept.
pub fn extract(record: &LogicalRecord) -> Result<FieldRow> {
    let collapsed = record.text.replace("\t\t", "\t");
    let parts: Vec<&str> = collapsed.split('\t').collect();

    if parts.len() < MIN_FIELDS {
        return Err(TallyError::MalformedRecord {
            file: record.source.clone(),
            line: record.line_number,
            found: parts.len(),
        });
    }

    Ok(FieldRow::new(
        parts[0],
        parts[1],
        parts[2],
        parts[3],
        parts[parts.len() - 1],
    ))
}

/// Parse one line of `all_lines.txt` back into a row
pub fn parse_tab_line(line: &str) -> Option<FieldRow> {
    let mut parts = line.split('\t');
    let row = FieldRow::new(
        parts.next()?,
        parts.next()?,
        parts.next()?,
        parts.next()?,
        parts.next()?,
    );
    parts.next().is_none().then_some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(text: &str) -> LogicalRecord {
        LogicalRecord::new("a.log", 7, text)
    }

    #[test]
    fn test_double_tab_collapse() {
        let row = extract(&record("a\t\tb\tc\td\te")).unwrap();
        assert_eq!(row, FieldRow::new("a", "b", "c", "d", "e"));
    }

    #[test]
    fn test_triple_tab_leaves_empty_field() {
        // Collapse runs once: "\t\t\t" -> "\t\t"
        let row = extract(&record("a\t\t\tb\tc\td")).unwrap();
        assert_eq!(row, FieldRow::new("a", "", "b", "c", "d"));
    }

    #[test]
    fn test_middle_columns_dropped() {
        let row = extract(&record("date\tuser\ttype\t20042\tignored\talso\tmessage")).unwrap();
        assert_eq!(row, FieldRow::new("date", "user", "type", "20042", "message"));
    }

    #[test]
    fn test_four_fields_reuses_code_as_message() {
        let row = extract(&record("d\tu\tt\t2506")).unwrap();
        assert_eq!(row.message, "2506");
    }

    #[test]
    fn test_malformed_record() {
        let err = extract(&record("d\tu\tt")).unwrap_err();
        match err {
            TallyError::MalformedRecord { file, line, found } => {
                assert_eq!((file.as_str(), line, found), ("a.log", 7, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tab_line_reparse() {
        let row = extract(&record("13/04/2021 10:22:31.123\tA\tB\t1\thello world")).unwrap();
        assert_eq!(parse_tab_line(&row.to_tab_line()), Some(row));
        assert_eq!(parse_tab_line("too\tfew"), None);
        assert_eq!(parse_tab_line("a\tb\tc\td\te\tf"), None);
    }
}
