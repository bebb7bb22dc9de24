//! Record assembly for a single part subtree.

use roxmltree::Node;
use std::collections::BTreeMap;

use crate::config::SCALE_BREAKPOINTS;
use crate::metrics::PowerRatings;
use crate::model::CalculationRecord;
use crate::parser::{
    find_all, resolve_decimal, resolve_duration, resolve_opt, resolve_text, try_parse_decimal,
};

use super::context::DocumentContext;

// Identification
const ARTICLE_NO: &[&str] = &["ArticleNo"];
const ARTICLE_DESCRIPTION: &[&str] = &["ArticleDescription"];

// Material
const MATERIAL_NAME: &[&str] = &["Material//MaterialName"];
const MATERIAL_THICKNESS: &[&str] = &["Material//MaterialThickness"];
const MATERIAL_COST: &[&str] = &["BasicMaterialGroupCosts/metric_qty"];

// Geometry
const SIZE_X: &[&str] = &["PartInformation//SizeX"];
const SIZE_Y: &[&str] = &["PartInformation//SizeY"];
const PART_WEIGHT: &[&str] = &["PartInformation//PartWeight"];
const PART_AREA: &[&str] = &["PartInformation//PartArea"];
const CUTTING_LENGTH: &[&str] = &["PartInformation//CuttingLength"];
/// The contour of the approximate geometry stores its bounding box
/// positionally: parameter 3 is the width, parameter 4 the height.
const CONTOUR_X: &[&str] = &["ApproxGeometry/outside/contour//parameter_3/val"];
const CONTOUR_Y: &[&str] = &["ApproxGeometry/outside/contour//parameter_4/val"];

// Working step
const WORK_STEP_NAME: &[&str] = &["WorkingStep//WorkStepName"];
const MACHINE_HOUR_COST: &[&str] =
    &["WorkingStep//WorkPlaceData//MachineHourCosts/Value/metric_qty"];
const OPERATOR_HOUR_COST: &[&str] = &["WorkingStep//WorkPlaceData//HourlyRate/Value/metric_qty"];
const OVERHEAD_RATE: &[&str] = &["WorkingStep//WorkPlaceData//OverheadRate/metric_qty"];
const LASER_TIME: &[&str] = &["WorkingStep//TargetProcessingTimeData//LaserTime"];
const POSITIONING_TIME: &[&str] = &["WorkingStep//TargetProcessingTimeData//PositioningTime"];
const SETUP_TIME: &[&str] = &["WorkingStep//TargetProcessingTimeData//SetupTime"];
const PALLET_CHANGING_TIME: &[&str] =
    &["WorkingStep//TargetProcessingTimeData//PalletChangingTime"];
const TOTAL_PROCESSING_TIME: &[&str] = &["WorkingStep//TargetProcessingTime"];

// Laser machine
const POWER_1_PERCENT: &[&str] = &["LaserMachine//Power1Percent"];
const POWER_100_PERCENT: &[&str] = &["LaserMachine//Power100Percent"];

// Prices
const NET_COST: &[&str] = &["SalesPrices/OrderPrice//NetcostsAPiece"];
const GROSS_COST: &[&str] = &["SalesPrices/OrderPrice//GrosscostsAPiece"];
const SCALE_ENTRY: &str = "ScalePriceEntry";
const SCALE_QUANTITY: &[&str] = &["Quantity"];
const SCALE_NET_COST: &[&str] = &["NetcostsAPiece"];

/// A record fresh from assembly, with the machine data the consumption
/// calculator still needs.
#[derive(Debug, Clone)]
pub struct AssembledPart {
    pub record: CalculationRecord,
    pub power: Option<PowerRatings>,
}

/// Builds records for the parts of one document.
pub struct RecordAssembler<'d> {
    ctx: &'d DocumentContext,
    filename: &'d str,
}

impl<'d> RecordAssembler<'d> {
    pub fn new(ctx: &'d DocumentContext, filename: &'d str) -> Self {
        Self { ctx, filename }
    }

    /// Assemble the record for `part`, copying order-wide values from the
    /// document context.
    pub fn assemble(&self, part: Node<'_, '_>) -> AssembledPart {
        let mut record = CalculationRecord::new(self.filename);
        record.part_id = part.attribute("ID").unwrap_or_default().to_string();

        self.ctx.apply_to(&mut record);

        record.article_no = resolve_text(part, ARTICLE_NO);
        record.article_description = resolve_text(part, ARTICLE_DESCRIPTION);

        record.material_name = resolve_text(part, MATERIAL_NAME);
        record.material_thickness = resolve_decimal(part, MATERIAL_THICKNESS);
        record.material_cost_per_kg = resolve_decimal(part, MATERIAL_COST);

        read_geometry(part, &mut record);
        read_working_step(part, &mut record);

        record.net_cost_per_piece = resolve_decimal(part, NET_COST);
        record.gross_cost_per_piece = resolve_decimal(part, GROSS_COST);
        apply_scale_prices(&scale_prices(part), &mut record);

        AssembledPart {
            record,
            power: read_power_ratings(part),
        }
    }
}

/// Dimensions, weight, area and cutting length, with the contour fallback
/// for dimensions that came out as zero.
fn read_geometry(part: Node<'_, '_>, record: &mut CalculationRecord) {
    record.part_dimensions_x = resolve_decimal(part, SIZE_X);
    record.part_dimensions_y = resolve_decimal(part, SIZE_Y);
    record.part_weight = resolve_decimal(part, PART_WEIGHT);
    record.part_area = resolve_decimal(part, PART_AREA);
    record.cutting_length = resolve_decimal(part, CUTTING_LENGTH);

    if record.part_dimensions_x == 0.0 {
        record.part_dimensions_x = resolve_decimal(part, CONTOUR_X);
    }
    if record.part_dimensions_y == 0.0 {
        record.part_dimensions_y = resolve_decimal(part, CONTOUR_Y);
    }
}

fn read_working_step(part: Node<'_, '_>, record: &mut CalculationRecord) {
    record.machine_name = resolve_text(part, WORK_STEP_NAME);
    record.machine_hour_cost = resolve_decimal(part, MACHINE_HOUR_COST);
    record.operator_hour_cost = resolve_decimal(part, OPERATOR_HOUR_COST);
    record.overhead_rate = resolve_decimal(part, OVERHEAD_RATE);

    record.laser_time = resolve_duration(part, LASER_TIME);
    record.positioning_time = resolve_duration(part, POSITIONING_TIME);
    record.setup_time = resolve_duration(part, SETUP_TIME);
    record.pallet_changing_time = resolve_duration(part, PALLET_CHANGING_TIME);
    record.total_processing_time = resolve_duration(part, TOTAL_PROCESSING_TIME);
}

/// Both power ratings, or nothing if either is missing.
fn read_power_ratings(part: Node<'_, '_>) -> Option<PowerRatings> {
    Some(PowerRatings {
        at_1_percent: resolve_opt(part, POWER_1_PERCENT, try_parse_decimal)?,
        at_100_percent: resolve_opt(part, POWER_100_PERCENT, try_parse_decimal)?,
    })
}

/// Collect quantity → unit cost from every scale-price entry under the part.
///
/// Quantities are truncated to whole pieces. A later entry for the same
/// quantity replaces an earlier one.
pub fn scale_prices(part: Node<'_, '_>) -> BTreeMap<u32, f64> {
    let mut prices = BTreeMap::new();

    for entry in find_all(part, SCALE_ENTRY) {
        let quantity = resolve_opt(entry, SCALE_QUANTITY, try_parse_decimal);
        let cost = resolve_opt(entry, SCALE_NET_COST, try_parse_decimal);
        if let (Some(quantity), Some(cost)) = (quantity, cost) {
            if quantity >= 0.0 {
                prices.insert(quantity.trunc() as u32, cost);
            }
        }
    }

    prices
}

/// Fill the breakpoint columns. Quantity 1 falls back to the net cost per
/// piece; the other breakpoints stay zero when no entry exists.
fn apply_scale_prices(prices: &BTreeMap<u32, f64>, record: &mut CalculationRecord) {
    for quantity in SCALE_BREAKPOINTS {
        let cost = match prices.get(&quantity) {
            Some(cost) => *cost,
            None if quantity == 1 => record.net_cost_per_piece,
            None => 0.0,
        };
        record.set_scale_cost(quantity, cost);
    }
}
