//! CalculationRecord - one flattened row per manufactured part.

use crate::config::{DEFAULT_CURRENCY, ZERO_DURATION};
use serde::{Deserialize, Serialize};

/// Consumption of one utility (electricity or a gas) for a part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilityUsage {
    /// Estimated consumption (kWh or Nm³).
    pub consumption: f64,
    /// Unit cost read from the document.
    pub unit_cost: f64,
    /// `consumption * unit_cost`.
    pub total_cost: f64,
}

impl UtilityUsage {
    /// Usage with a known unit cost and nothing consumed yet.
    pub fn priced(unit_cost: f64) -> Self {
        Self {
            unit_cost,
            ..Default::default()
        }
    }

    /// Record a consumption and price it at the unit cost.
    pub fn charge(&mut self, consumption: f64) {
        self.consumption = consumption;
        self.total_cost = consumption * self.unit_cost;
    }
}

/// Normalized calculation result for one physical part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    // === Identification ===
    /// Source document file name.
    pub filename: String,
    /// `ID` attribute of the part element (unique within its document).
    pub part_id: String,
    /// Article/order number.
    pub article_no: String,
    /// Free-text article description.
    pub article_description: String,

    // === Part geometry ===
    /// Bounding width in mm.
    pub part_dimensions_x: f64,
    /// Bounding height in mm.
    pub part_dimensions_y: f64,
    /// Weight in kg.
    pub part_weight: f64,
    /// Area in mm².
    pub part_area: f64,
    /// Cutting path length in mm.
    pub cutting_length: f64,

    // === Material ===
    pub material_name: String,
    /// Sheet thickness in mm.
    pub material_thickness: f64,
    /// Material cost per kg.
    pub material_cost_per_kg: f64,

    // === Working step ===
    pub machine_name: String,
    pub machine_hour_cost: f64,
    pub operator_hour_cost: f64,
    pub overhead_rate: f64,
    pub laser_time: String,
    pub positioning_time: String,
    pub setup_time: String,
    pub pallet_changing_time: String,
    pub total_processing_time: String,

    // === Consumption (derived) ===
    /// Electricity in kWh.
    pub electricity: UtilityUsage,
    /// Compressed air in Nm³.
    pub compressed_air: UtilityUsage,
    /// Oxygen in Nm³.
    pub oxygen: UtilityUsage,
    /// Nitrogen in Nm³.
    pub nitrogen: UtilityUsage,
    /// Argon in Nm³. Never estimated.
    pub argon: UtilityUsage,

    // === Nesting ===
    pub sheet_dimensions_x: f64,
    pub sheet_dimensions_y: f64,
    pub parts_per_sheet: u32,
    /// Material utilization in percent.
    pub material_utilization: f64,
    /// Waste in percent.
    pub waste_percentage: f64,
    /// Material consumption in m².
    pub material_consumption: f64,

    // === Costs ===
    pub net_cost_per_piece: f64,
    pub gross_cost_per_piece: f64,
    pub cost_qty_1: f64,
    pub cost_qty_10: f64,
    pub cost_qty_100: f64,
    pub cost_qty_500: f64,

    // === Metadata ===
    pub currency: String,
    pub calculation_date: String,
    /// Version string of the producing tool.
    pub author_version: String,
}

impl Default for CalculationRecord {
    fn default() -> Self {
        Self {
            filename: String::new(),
            part_id: String::new(),
            article_no: String::new(),
            article_description: String::new(),
            part_dimensions_x: 0.0,
            part_dimensions_y: 0.0,
            part_weight: 0.0,
            part_area: 0.0,
            cutting_length: 0.0,
            material_name: String::new(),
            material_thickness: 0.0,
            material_cost_per_kg: 0.0,
            machine_name: String::new(),
            machine_hour_cost: 0.0,
            operator_hour_cost: 0.0,
            overhead_rate: 0.0,
            laser_time: ZERO_DURATION.to_string(),
            positioning_time: ZERO_DURATION.to_string(),
            setup_time: ZERO_DURATION.to_string(),
            pallet_changing_time: ZERO_DURATION.to_string(),
            total_processing_time: ZERO_DURATION.to_string(),
            electricity: UtilityUsage::default(),
            compressed_air: UtilityUsage::default(),
            oxygen: UtilityUsage::default(),
            nitrogen: UtilityUsage::default(),
            argon: UtilityUsage::default(),
            sheet_dimensions_x: 0.0,
            sheet_dimensions_y: 0.0,
            parts_per_sheet: 0,
            material_utilization: 0.0,
            waste_percentage: 0.0,
            material_consumption: 0.0,
            net_cost_per_piece: 0.0,
            gross_cost_per_piece: 0.0,
            cost_qty_1: 0.0,
            cost_qty_10: 0.0,
            cost_qty_100: 0.0,
            cost_qty_500: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            calculation_date: String::new(),
            author_version: String::new(),
        }
    }
}

impl CalculationRecord {
    /// Create an empty record attributed to a source file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Whether the record carries an article number or a positive net cost.
    ///
    /// Parts with neither are template/default stubs and are not emitted.
    pub fn is_informative(&self) -> bool {
        !self.article_no.trim().is_empty() || self.net_cost_per_piece > 0.0
    }

    /// Set the cost for a quantity breakpoint. Other quantities are ignored.
    pub fn set_scale_cost(&mut self, quantity: u32, cost: f64) {
        match quantity {
            1 => self.cost_qty_1 = cost,
            10 => self.cost_qty_10 = cost,
            100 => self.cost_qty_100 = cost,
            500 => self.cost_qty_500 = cost,
            _ => {}
        }
    }
}
