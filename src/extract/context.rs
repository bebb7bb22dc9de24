//! Order-wide values shared by every part of a document.

use roxmltree::Node;

use crate::config::ExtractConfig;
use crate::metrics::UnitCosts;
use crate::model::CalculationRecord;
use crate::parser::{
    find_all, find_first, resolve_decimal, resolve_opt, resolve_text, try_parse_decimal,
};

const CALCULATION_DATE: &[&str] = &["datetime"];
const AUTHOR_VERSION: &[&str] = &["author@authorversion"];
const BASE_CURRENCY: &[&str] = &["Options@BaseCurrency"];
const NESTING_ALLOCATION: &str = "nesting//allocation";
const MATERIAL_CONSUMPTION: &[&str] = &["sheetData//materialConsumption/value"];
const WASTE: &[&str] = &["waste/value"];

const ELECTRICITY_COST: &[&str] = &["OrderData/Operator//ElectricEnergyCosts/metric_qty"];
const COMPRESSED_AIR_COST: &[&str] = &["OrderData/Operator//CompressedAir/Costs/metric_qty"];
const OXYGEN_COST: &[&str] = &["OrderData/Operator//Oxygen/Costs/metric_qty"];
const NITROGEN_COST: &[&str] = &["OrderData/Operator//Nitrogen/Costs/metric_qty"];
const ARGON_COST: &[&str] = &["OrderData/Operator//Argon/Costs/metric_qty"];

/// Document-level fields, read once and copied into each part record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentContext {
    pub currency: String,
    pub calculation_date: String,
    pub author_version: String,
    /// Sheet size from the nesting allocation's `sheet-id`, if decodable.
    pub sheet_dimensions: Option<(f64, f64)>,
    pub parts_per_sheet: u32,
    pub material_consumption: f64,
    /// Waste in percent, when the document reports it.
    pub waste_percentage: Option<f64>,
    pub unit_costs: UnitCosts,
}

impl DocumentContext {
    /// Read the order-wide fields below `root`.
    pub fn read(root: Node<'_, '_>, config: &ExtractConfig) -> Self {
        let mut ctx = Self {
            currency: resolve_string(root, BASE_CURRENCY)
                .unwrap_or_else(|| config.default_currency.clone()),
            calculation_date: resolve_text(root, CALCULATION_DATE),
            author_version: resolve_text(root, AUTHOR_VERSION),
            material_consumption: resolve_decimal(root, MATERIAL_CONSUMPTION),
            waste_percentage: resolve_opt(root, WASTE, try_parse_decimal),
            unit_costs: UnitCosts {
                electricity: resolve_decimal(root, ELECTRICITY_COST),
                compressed_air: resolve_decimal(root, COMPRESSED_AIR_COST),
                oxygen: resolve_decimal(root, OXYGEN_COST),
                nitrogen: resolve_decimal(root, NITROGEN_COST),
                argon: resolve_decimal(root, ARGON_COST),
            },
            ..Default::default()
        };

        if let Some(allocation) = find_first(root, NESTING_ALLOCATION) {
            ctx.sheet_dimensions = allocation
                .attribute("sheet-id")
                .and_then(parse_sheet_dimensions);
            ctx.parts_per_sheet = find_all(allocation, "pos").len() as u32;
        }

        ctx
    }

    /// Copy the shared fields into a part record.
    pub fn apply_to(&self, record: &mut CalculationRecord) {
        record.currency = self.currency.clone();
        record.calculation_date = self.calculation_date.clone();
        record.author_version = self.author_version.clone();

        if let Some((x, y)) = self.sheet_dimensions {
            record.sheet_dimensions_x = x;
            record.sheet_dimensions_y = y;
        }
        record.parts_per_sheet = self.parts_per_sheet;
        record.material_consumption = self.material_consumption;

        if let Some(waste) = self.waste_percentage {
            record.waste_percentage = waste;
            record.material_utilization = 100.0 - waste;
        }
    }
}

fn resolve_string(root: Node<'_, '_>, candidates: &[&str]) -> Option<String> {
    resolve_opt(root, candidates, |s| Some(s.to_string()))
}

/// Decode sheet width and height from a sheet identifier.
///
/// The identifier is split on `x` (or `×`); it must have at least three
/// tokens and the last two must both be numbers, e.g. `ST37-2.0x3000x1500`.
pub fn parse_sheet_dimensions(sheet_id: &str) -> Option<(f64, f64)> {
    let tokens: Vec<&str> = sheet_id.split(['x', '×']).collect();
    if tokens.len() < 3 {
        return None;
    }

    let width = tokens[tokens.len() - 2].trim().parse::<f64>().ok()?;
    let height = tokens[tokens.len() - 1].trim().parse::<f64>().ok()?;
    Some((width, height))
}
