use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use logtally_types::{AllowList, FieldRow, LogicalRecord};

use crate::aggregator::compute_statistics;
use crate::error::{Result, TallyError};
use crate::export::{write_all_lines, write_statistics};
use crate::extractor::extract;
use crate::filter::ScrubFilter;
use crate::reassembler::reassemble;
use crate::source::{discover, display_name, read_source};

/// Name of the flattened row dump inside the output directory
pub const ALL_LINES_FILE: &str = "all_lines.txt";

/// Name of the statistics table inside the output directory
pub const STATISTICS_FILE: &str = "statistics.csv";

/// Everything one run needs
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub allow_list: AllowList,
    /// Only read files with this extension
    pub extension: Option<String>,
    pub scrub: ScrubFilter,
    /// Drop records with too few fields instead of failing the run
    pub skip_malformed: bool,
}

impl PipelineConfig {
    /// Defaults: embedded allow-list, every file read, nothing scrubbed
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            allow_list: AllowList::default(),
            extension: None,
            scrub: ScrubFilter::default(),
            skip_malformed: false,
        }
    }
}

/// What a completed run did
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub files: usize,
    pub records: usize,
    pub rows: usize,
    pub skipped: usize,
    pub statistics: usize,
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
    pub all_lines_path: PathBuf,
    pub statistics_path: PathBuf,
}

/// Run the whole transformation: read, reassemble, extract, count, write
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let start = Instant::now();

    let files = discover(&config.input_dir, config.extension.as_deref())?;
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| TallyError::write(&config.output_dir, e))?;

    let records = collect_records(&files, &config.scrub)?;
    let (rows, skipped) = extract_rows(&records, config.skip_malformed)?;

    let all_lines_path = config.output_dir.join(ALL_LINES_FILE);
    write_file(&all_lines_path, |f| write_all_lines(f, &rows))?;

    let stats = compute_statistics(&rows, &config.allow_list);
    let statistics_path = config.output_dir.join(STATISTICS_FILE);
    write_file(&statistics_path, |f| write_statistics(f, &stats))?;

    let (earliest, latest) = time_span(&records);
    let summary = RunSummary {
        files: files.len(),
        records: records.len(),
        rows: rows.len(),
        skipped,
        statistics: stats.len(),
        earliest,
        latest,
        all_lines_path,
        statistics_path,
    };

    info!(
        files = summary.files,
        records = summary.records,
        codes = summary.statistics,
        "Exported {} statistics rows",
        summary.statistics
    );
    debug!("Time taken: {:?}", start.elapsed());

    Ok(summary)
}

/// Reassemble every file in order into one sequence of records
pub fn collect_records(files: &[PathBuf], scrub: &ScrubFilter) -> Result<Vec<LogicalRecord>> {
    let mut all = Vec::new();

    for (i, path) in files.iter().enumerate() {
        let name = display_name(path);
        info!("Processing file {}/{}: {}", i + 1, files.len(), name);

        let text = read_source(path)?;
        let mut records = reassemble(&name, &text)?;
        debug!(file = %name, records = records.len(), "Reassembled file");

        if !scrub.is_empty() {
            records.iter_mut().for_each(|r| scrub.apply(r));
        }
        all.extend(records);
    }

    Ok(all)
}

/// Extract a row from every record. Returns the rows and how many records
/// were skipped as malformed.
pub fn extract_rows(
    records: &[LogicalRecord],
    skip_malformed: bool,
) -> Result<(Vec<FieldRow>, usize)> {
    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for record in records {
        match extract(record) {
            Ok(row) => rows.push(row),
            Err(e @ TallyError::MalformedRecord { .. }) if skip_malformed => {
                warn!("Skipping record: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok((rows, skipped))
}

/// Earliest and latest record timestamps
fn time_span(records: &[LogicalRecord]) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let stamps = records.iter().filter_map(LogicalRecord::timestamp);
    stamps.fold((None, None), |(lo, hi), ts| {
        (
            Some(lo.map_or(ts, |lo: NaiveDateTime| lo.min(ts))),
            Some(hi.map_or(ts, |hi: NaiveDateTime| hi.max(ts))),
        )
    })
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| TallyError::write(path, e))?;
    body(BufWriter::new(file)).map_err(|e| TallyError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: usize, text: &str) -> LogicalRecord {
        LogicalRecord::new("a.log", line, text)
    }

    #[test]
    fn test_extract_rows_fails_on_malformed_by_default() {
        let records = vec![record(1, "d\tu\tt\t1\tm"), record(2, "d\tu")];
        let err = extract_rows(&records, false).unwrap_err();
        assert!(matches!(err, TallyError::MalformedRecord { line: 2, found: 2, .. }));
    }

    #[test]
    fn test_extract_rows_skip_malformed() {
        let records = vec![
            record(1, "d\tu\tt\t1\tm"),
            record(2, "d\tu"),
            record(3, "d\tu\tt\t2\tn"),
        ];
        let (rows, skipped) = extract_rows(&records, true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_time_span() {
        let records = vec![
            record(1, "13/04/2021 10:22:31.123\tx"),
            record(2, "01/01/2020 00:00:00.000\tx"),
            record(3, "99/99/2021 10:22:31.123\tx"),
            record(4, "31/12/2022 23:59:59.999\tx"),
        ];
        let (lo, hi) = time_span(&records);
        assert_eq!(lo.unwrap().to_string(), "2020-01-01 00:00:00");
        assert_eq!(hi.unwrap().to_string(), "2022-12-31 23:59:59.999");
    }

    #[test]
    fn test_time_span_empty() {
        assert_eq!(time_span(&[]), (None, None));
    }
}
