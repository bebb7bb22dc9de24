//! cprj-summary - Flatten CAM calculation result documents into a table.
//!
//! Each result document describes one production order with one or more
//! sheet-metal parts. This library extracts one [`CalculationRecord`] per
//! manufactured part, resolving fields that may live in several places in
//! the XML tree, and estimates energy and gas consumption that the source
//! does not contain.
//!
//! # Example
//!
//! ```no_run
//! use cprj_summary::{summarize_files, write_csv_file, ExtractConfig};
//! use std::path::{Path, PathBuf};
//!
//! let config = ExtractConfig::default();
//! let summary = summarize_files(&[PathBuf::from("order-0815.cprj")], &config);
//! write_csv_file(&summary.records, Path::new("calculation_summary.csv")).unwrap();
//! println!("{} part(s)", summary.records.len());
//! ```

pub mod aggregate;
pub mod config;
pub mod discover;
pub mod error;
pub mod export;
pub mod extract;
pub mod metrics;
pub mod model;
pub mod parser;

// Re-exports for convenience
pub use aggregate::{Aggregator, BatchStats, BatchSummary};
pub use config::{ConsumptionRates, ExtractConfig, GasRate, MaterialRules};
pub use discover::{discover_files, DEFAULT_EXTENSION};
pub use error::{ErrorCode, ExtractError, Result};
pub use export::{write_csv, write_csv_file, write_json, COLUMNS};
pub use extract::{extract_document, extract_str, DocumentExtraction};
pub use metrics::{ConsumptionCalculator, MaterialClass, MaterialClassifier};
pub use model::{CalculationRecord, UtilityUsage};

/// Extract records from a list of result files.
///
/// Files are processed in order. A file that cannot be read or parsed is
/// logged and contributes no records; the rest of the batch continues.
pub fn summarize_files(paths: &[std::path::PathBuf], config: &ExtractConfig) -> BatchSummary {
    Aggregator::new(config).run(paths)
}
