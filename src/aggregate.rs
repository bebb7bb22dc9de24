//! Batch processing over many result documents.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::extract::{extract_document, DocumentExtraction};
use crate::model::CalculationRecord;
use crate::parser::{parse_document, read_document, source_filename};

/// Counts reported for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Documents read and parsed successfully.
    pub documents_processed: usize,
    /// Documents that could not be read or parsed.
    pub documents_skipped: usize,
    /// Records emitted across all documents.
    pub records_emitted: usize,
    /// Order/root pseudo-parts left out.
    pub parts_excluded: usize,
    /// Parts dropped for carrying no article number or cost.
    pub parts_discarded: usize,
}

impl BatchStats {
    /// Add the counts of one extracted document.
    pub fn add_document(&mut self, extraction: &DocumentExtraction) {
        self.documents_processed += 1;
        self.records_emitted += extraction.records.len();
        self.parts_excluded += extraction.excluded;
        self.parts_discarded += extraction.discarded;
    }

    /// Record a document that failed.
    pub fn add_skipped(&mut self) {
        self.documents_skipped += 1;
    }
}

/// Records of a batch, in input order, with run statistics.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub records: Vec<CalculationRecord>,
    pub stats: BatchStats,
}

impl BatchSummary {
    /// Number of records per source file, in order of first appearance.
    pub fn parts_per_file(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for record in &self.records {
            match counts.iter_mut().find(|(name, _)| *name == record.filename) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.filename.as_str(), 1)),
            }
        }
        counts
    }

    /// Files that yielded more than one record.
    pub fn multi_part_files(&self) -> Vec<(&str, usize)> {
        self.parts_per_file()
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .collect()
    }

    /// Mean net cost per piece over records with a positive cost.
    pub fn average_net_cost(&self) -> Option<f64> {
        let costs: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.net_cost_per_piece)
            .filter(|c| *c > 0.0)
            .collect();
        if costs.is_empty() {
            None
        } else {
            Some(costs.iter().sum::<f64>() / costs.len() as f64)
        }
    }
}

/// Runs extraction over a list of documents.
pub struct Aggregator<'c> {
    config: &'c ExtractConfig,
}

impl<'c> Aggregator<'c> {
    pub fn new(config: &'c ExtractConfig) -> Self {
        Self { config }
    }

    /// Extract one file.
    pub fn process_file(&self, path: &Path) -> Result<DocumentExtraction> {
        let filename = source_filename(path);
        let content = read_document(path)?;
        let doc = parse_document(&content, &filename)?;
        Ok(extract_document(&doc, &filename, self.config))
    }

    /// Extract every file in order. Failed documents are logged and
    /// counted; they never abort the batch.
    pub fn run(&self, paths: &[PathBuf]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for path in paths {
            match self.process_file(path) {
                Ok(extraction) => {
                    debug!(
                        "{}: {} record(s)",
                        path.display(),
                        extraction.records.len()
                    );
                    summary.stats.add_document(&extraction);
                    summary.records.extend(extraction.records);
                }
                Err(err) => {
                    warn!(
                        code = err.code_value(),
                        "Error parsing file {}: {}",
                        path.display(),
                        err
                    );
                    summary.stats.add_skipped();
                }
            }
        }

        info!(
            "Processed {} document(s), skipped {}, emitted {} record(s)",
            summary.stats.documents_processed,
            summary.stats.documents_skipped,
            summary.stats.records_emitted
        );

        summary
    }
}
