use regex::Regex;
use std::sync::LazyLock;

use logtally_types::LogicalRecord;

use crate::error::{Result, TallyError};

/// `DD/MM/YYYY HH:MM:SS.mmm` anchored at the start of the line
static RECORD_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}\.\d{3}").expect("record-start pattern")
});

/// Check whether a raw line opens a new record
pub fn is_record_start(line: &str) -> bool {
    RECORD_START.is_match(line)
}

/// Line-by-line accumulator that merges continuation lines into the record
/// they belong to.
///
/// At most one record is open at a time. It is handed back when the next
/// record-start line arrives, or by [`Reassembler::finish`] at end of file.
#[derive(Debug)]
pub struct Reassembler {
    source: String,
    open: Option<LogicalRecord>,
}

impl Reassembler {
    /// Create a reassembler for one source file
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            open: None,
        }
    }

    /// Feed one raw line (without its line terminator).
    ///
    /// Returns the previously open record once `line` starts a new one.
    pub fn push(&mut self, line_number: usize, line: &str) -> Result<Option<LogicalRecord>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if is_record_start(line) {
            let next = LogicalRecord::new(self.source.as_str(), line_number, trimmed);
            return Ok(self.open.replace(next));
        }

        match self.open.as_mut() {
            Some(record) => {
                record.append(trimmed);
                Ok(None)
            }
            None => Err(TallyError::DanglingContinuation {
                file: self.source.clone(),
                line: line_number,
            }),
        }
    }

    /// Close the file, yielding the last open record (if any)
    pub fn finish(self) -> Option<LogicalRecord> {
        self.open
    }
}

/// Reassemble the full text of one file into logical records, in file order
pub fn reassemble(source: &str, text: &str) -> Result<Vec<LogicalRecord>> {
    let mut reassembler = Reassembler::new(source);
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if let Some(done) = reassembler.push(idx + 1, line)? {
            records.push(done);
        }
    }
    records.extend(reassembler.finish());

    Ok(records)
}
