//! cprj-summary - CLI tool to tabulate CAM calculation results.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cprj_summary::{
    discover_files, summarize_files, write_csv, write_csv_file, write_json, ExtractConfig,
    DEFAULT_EXTENSION,
};

/// Number of multi-part files listed in the run summary.
const MULTI_PART_PREVIEW: usize = 5;

/// Output table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// Summarize CAM calculation result files into a per-part table.
#[derive(Parser, Debug)]
#[command(name = "cprj-summary")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Result files or directories to search
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File extension to collect from directories
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// JSON file overriding extraction settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ExtractConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExtractConfig::default(),
    };

    let files = discover_files(&args.inputs, &args.extension);
    if files.is_empty() {
        anyhow::bail!("No files matching '*.{}' found", args.extension);
    }
    info!("Found {} file(s) matching '*.{}'", files.len(), args.extension);

    let summary = summarize_files(&files, &config);

    if summary.records.is_empty() {
        warn!("No files contained valid calculation results");
        return Ok(());
    }

    match (&args.output, args.format) {
        (Some(path), Format::Csv) => write_csv_file(&summary.records, path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        (Some(path), Format::Json) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_json(&summary.records, file)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        (None, Format::Csv) => write_csv(&summary.records, io::stdout().lock())?,
        (None, Format::Json) => write_json(&summary.records, io::stdout().lock())?,
    }

    if let Some(path) = &args.output {
        info!(
            "Exported {} part summaries to {}",
            summary.records.len(),
            path.display()
        );
    }

    info!(
        "Processed {} part(s) from {} file(s)",
        summary.records.len(),
        files.len()
    );

    let multi_part = summary.multi_part_files();
    if !multi_part.is_empty() {
        info!("Multi-part files detected: {} file(s)", multi_part.len());
        for (filename, count) in multi_part.iter().take(MULTI_PART_PREVIEW) {
            info!("  {}: {} parts", filename, count);
        }
    }

    let with_cost = summary
        .records
        .iter()
        .filter(|r| r.net_cost_per_piece > 0.0)
        .count();
    info!("Parts with cost data: {}", with_cost);
    if let Some(avg) = summary.average_net_cost() {
        info!("Average cost per piece: {:.2}", avg);
    }

    Ok(())
}
