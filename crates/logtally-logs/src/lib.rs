//! Log processing for logtally
//!
//! This crate reassembles multi-line log records, extracts their columns,
//! and counts allow-listed codes.

mod aggregator;
mod error;
mod export;
mod extractor;
mod filter;
mod pipeline;
mod reassembler;
mod source;

pub use aggregator::{allowed_row_count, compute_statistics};
pub use error::{Result, TallyError};
pub use export::{STATISTICS_HEADER, write_all_lines, write_statistics};
pub use extractor::{MIN_FIELDS, extract, parse_tab_line};
pub use filter::{ScrubFilter, TRACK_MARKERS};
pub use pipeline::{
    ALL_LINES_FILE, PipelineConfig, RunSummary, STATISTICS_FILE, collect_records, extract_rows, run,
};
pub use reassembler::{Reassembler, is_record_start, reassemble};
pub use source::{discover, display_name, read_source};

// Re-export types used in our public API
pub use logtally_types::{AllowList, CodeStatistic, DEFAULT_CODES, FieldRow, LogicalRecord};
