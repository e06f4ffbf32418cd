//! Run configuration
//!
//! Settings come from three layers: command-line flags, an optional TOML
//! file, and built-in defaults, in that order of precedence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use logtally_logs::{AllowList, PipelineConfig, ScrubFilter, TRACK_MARKERS};

/// Input directory used when neither flag nor config file names one
pub const DEFAULT_INPUT_DIR: &str = "data";

/// Output directory used when neither flag nor config file names one
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Contents of the TOML config file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Replaces the embedded code list
    pub allow_list: Option<AllowList>,
    pub extension: Option<String>,
    pub scrub_patterns: Vec<String>,
    pub strip_track_markers: bool,
    pub skip_malformed: bool,
}

impl FileConfig {
    /// Load and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Settings that can be given on the command line
#[derive(clap::Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Directory containing the log files [default: data]
    #[arg(long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory the reports are written to [default: output]
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only read files with this extension (e.g. "log")
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Remove [SpurN] track markers from records
    #[arg(long)]
    pub strip_track_markers: bool,

    /// Skip records with fewer than 4 fields instead of failing
    #[arg(long)]
    pub skip_malformed: bool,
}

/// Merge flags over the file config over the defaults
pub fn resolve(file: FileConfig, cli: &Overrides) -> Result<PipelineConfig> {
    let input_dir = cli
        .input
        .clone()
        .or(file.input_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let output_dir = cli
        .output
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut patterns = Vec::new();
    if cli.strip_track_markers || file.strip_track_markers {
        patterns.push(TRACK_MARKERS.to_string());
    }
    patterns.extend(file.scrub_patterns);
    let scrub = ScrubFilter::new(&patterns).context("Invalid scrub_patterns")?;

    Ok(PipelineConfig {
        input_dir,
        output_dir,
        allow_list: file.allow_list.unwrap_or_default(),
        extension: cli.extension.clone().or(file.extension),
        scrub,
        skip_malformed: cli.skip_malformed || file.skip_malformed,
    })
}
