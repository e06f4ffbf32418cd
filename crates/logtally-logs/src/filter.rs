use regex::Regex;

use logtally_types::LogicalRecord;

use crate::error::{Result, TallyError};

/// Matches the `[Spur1]`..`[Spur12]` track markers some devices add
pub const TRACK_MARKERS: &str = r"\[Spur\d{1,2}\]";

/// Compiled set of patterns removed from record text before extraction
#[derive(Clone, Default)]
pub struct ScrubFilter {
    /// Compiled patterns, applied in order
    patterns: Vec<Regex>,
}

impl ScrubFilter {
    /// Compile a list of regex patterns
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| TallyError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Remove every match of every pattern from the record text
    pub fn apply(&self, record: &mut LogicalRecord) {
        for re in &self.patterns {
            if re.is_match(&record.text) {
                record.text = re.replace_all(&record.text, "").into_owned();
            }
        }
    }

    /// Check if filter has no patterns (leaves records untouched)
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl std::fmt::Debug for ScrubFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns: Vec<&str> = self.patterns.iter().map(|r| r.as_str()).collect();
        f.debug_struct("ScrubFilter").field("patterns", &patterns).finish()
    }
}
