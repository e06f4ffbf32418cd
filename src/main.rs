mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::{FileConfig, Overrides};

/// Logtally - reassemble multi-line log files and tally allow-listed codes
#[derive(Parser, Debug)]
#[command(name = "logtally")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

fn main() {
    let args = Args::parse();

    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = config::resolve(file, &args.overrides)?;

    let summary = logtally_logs::run(&config)
        .with_context(|| format!("Failed to process {}", config.input_dir.display()))?;

    if summary.skipped > 0 {
        info!(skipped = summary.skipped, "Some malformed records were skipped");
    }
    if let (Some(first), Some(last)) = (summary.earliest, summary.latest) {
        info!("Records span {} to {}", first, last);
    }
    info!(
        "Wrote {} and {}",
        summary.all_lines_path.display(),
        summary.statistics_path.display()
    );

    Ok(())
}
