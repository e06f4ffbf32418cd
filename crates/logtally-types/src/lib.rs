//! Shared types for logtally
//!
//! This crate contains the data structures passed between the reassembler,
//! the extractor and the statistics aggregator.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashSet;

// ============================================================================
// Record Types
// ============================================================================

/// Length of the `DD/MM/YYYY HH:MM:SS.mmm` prefix that starts every record
pub const TIMESTAMP_LEN: usize = 23;

/// Format of the record-start timestamp, as understood by chrono
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S%.3f";

/// One fully reassembled log entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalRecord {
    /// File the record was read from
    pub source: String,

    /// 1-based line number of the record-start line
    pub line_number: usize,

    /// Record text, continuation lines joined with a single space
    pub text: String,
}

impl LogicalRecord {
    pub fn new(source: impl Into<String>, line_number: usize, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line_number,
            text: text.into(),
        }
    }

    /// Append a continuation line, separated by a single space
    pub fn append(&mut self, continuation: &str) {
        self.text.push(' ');
        self.text.push_str(continuation);
    }

    /// Parse the leading timestamp.
    ///
    /// Returns `None` when the prefix has the right shape but does not name a
    /// real date (month 13, hour 25, ...).
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let prefix = self.text.get(..TIMESTAMP_LEN)?;
        NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok()
    }
}

/// The five columns kept from every record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRow {
    pub date: String,
    pub user: String,
    pub kind: String,
    pub code: String,
    pub message: String,
}

impl FieldRow {
    pub fn new(
        date: impl Into<String>,
        user: impl Into<String>,
        kind: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            user: user.into(),
            kind: kind.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Fields in column order
    pub fn fields(&self) -> [&str; 5] {
        [
            self.date.as_str(),
            self.user.as_str(),
            self.kind.as_str(),
            self.code.as_str(),
            self.message.as_str(),
        ]
    }

    /// Tab-joined form used in `all_lines.txt`
    pub fn to_tab_line(&self) -> String {
        self.fields().join("\t")
    }
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Occurrence count of one allow-listed code, with its first row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeStatistic {
    /// First row (in overall record order) carrying this code
    pub first: FieldRow,

    /// Total rows carrying this code
    pub count: usize,
}

impl CodeStatistic {
    pub fn code(&self) -> &str {
        &self.first.code
    }
}

/// Codes reported by the statistics table.
///
/// Membership only; order and duplicates in the source list don't matter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct AllowList {
    codes: HashSet<String>,
}

/// Codes reported when no list is configured. `20045` is listed twice
/// upstream; the set collapses it.
pub const DEFAULT_CODES: [&str; 22] = [
    "20042", "20039", "20009", "20008", "20045", "20031", "2506", "20034", "20005", "20045",
    "20012", "20043", "20040", "2002", "20054", "2006", "9007", "20055", "20041", "20038",
    "20025", "20013",
];

impl AllowList {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Number of distinct codes
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_CODES)
    }
}

impl From<Vec<String>> for AllowList {
    fn from(codes: Vec<String>) -> Self {
        Self::new(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_default_allow_list_collapses_duplicates() {
        let allow = AllowList::default();
        assert_eq!(allow.len(), 21);
        assert!(allow.contains("20045"));
        assert!(allow.contains("9007"));
        assert!(!allow.contains("99999"));
    }

    #[test]
    fn test_allow_list_from_toml_array() {
        #[derive(Deserialize)]
        struct Wrapper {
            allow_list: AllowList,
        }

        let parsed: Wrapper = toml::from_str(r#"allow_list = ["1", "2", "2"]"#).unwrap();
        assert_eq!(parsed.allow_list, AllowList::new(["1", "2"]));
    }

    #[test]
    fn test_record_timestamp() {
        let record = LogicalRecord::new("a.log", 1, "13/04/2021 10:22:31.123\tA\tB\t1\thello");
        let ts = record.timestamp().unwrap();
        assert_eq!((ts.day(), ts.month(), ts.year()), (13, 4, 2021));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (10, 22, 31));
        assert_eq!(ts.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_record_timestamp_invalid_calendar() {
        let record = LogicalRecord::new("a.log", 1, "41/13/2021 10:22:31.123\tx");
        assert!(record.timestamp().is_none());

        // Multi-byte text shorter than the prefix must not panic
        let record = LogicalRecord::new("a.log", 1, "─────");
        assert!(record.timestamp().is_none());
    }

    #[test]
    fn test_append_continuation() {
        let mut record = LogicalRecord::new("a.log", 3, "head");
        record.append("tail");
        assert_eq!(record.text, "head tail");
        assert_eq!(record.line_number, 3);
    }

    #[test]
    fn test_field_row_tab_line() {
        let row = FieldRow::new("d", "u", "t", "c", "m");
        assert_eq!(row.to_tab_line(), "d\tu\tt\tc\tm");
    }
}
