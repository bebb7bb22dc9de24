//! Per-document extraction: part discovery, record assembly and derived
//! consumption.

mod assemble;
mod context;
mod qualify;

pub use assemble::{scale_prices, AssembledPart, RecordAssembler};
pub use context::{parse_sheet_dimensions, DocumentContext};
pub use qualify::{find_parts, qualify, PartStatus};

use roxmltree::Document;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::metrics::ConsumptionCalculator;
use crate::model::CalculationRecord;
use crate::parser::parse_document;

/// Records produced from one document, with the parts that were left out.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtraction {
    /// Emitted records in part discovery order.
    pub records: Vec<CalculationRecord>,
    /// Order/root pseudo-parts skipped before assembly.
    pub excluded: usize,
    /// Assembled parts dropped for carrying no article number or cost.
    pub discarded: usize,
}

/// Extract all part records from a parsed document.
pub fn extract_document(
    doc: &Document<'_>,
    filename: &str,
    config: &ExtractConfig,
) -> DocumentExtraction {
    let root = doc.root_element();
    let ctx = DocumentContext::read(root, config);
    let assembler = RecordAssembler::new(&ctx, filename);
    let calculator = ConsumptionCalculator::from_config(config);

    let mut extraction = DocumentExtraction::default();

    for part in find_parts(root, config) {
        let part_id = part.attribute("ID").unwrap_or("?");

        let status = qualify(part, config);
        if !status.is_manufactured() {
            debug!("{}: skipping part {} ({:?})", filename, part_id, status);
            extraction.excluded += 1;
            continue;
        }

        let AssembledPart { mut record, power } = assembler.assemble(part);
        if !record.is_informative() {
            debug!("{}: discarding part {} without article or cost", filename, part_id);
            extraction.discarded += 1;
            continue;
        }

        calculator.apply(&mut record, &ctx.unit_costs, power);
        extraction.records.push(record);
    }

    extraction
}

/// Parse document text and extract its records.
pub fn extract_str(
    content: &str,
    filename: &str,
    config: &ExtractConfig,
) -> Result<DocumentExtraction> {
    let doc = parse_document(content, filename)?;
    Ok(extract_document(&doc, filename, config))
}
