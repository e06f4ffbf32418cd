use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TallyError
pub type Result<T> = std::result::Result<T, TallyError>;

/// Every way a tally run can fail. All of them abort the run.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("input directory not found: {}", .0.display())]
    MissingInputDirectory(PathBuf),

    #[error("{file}:{line}: continuation line with no preceding record")]
    DanglingContinuation { file: String, line: usize },

    #[error("{file}:{line}: record has {found} tab-delimited fields, expected at least 4")]
    MalformedRecord {
        file: String,
        line: usize,
        found: usize,
    },

    #[error("failed to read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scrub pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl TallyError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}
