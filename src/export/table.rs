//! Fixed column schema and CSV/JSON writers.

use crate::error::Result;
use crate::model::CalculationRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output columns, in order. Stable for a given crate version.
///
/// Monetary columns carry the historical `_eur` suffix whatever the
/// record's `currency`; the `currency` column names the actual unit.
pub const COLUMNS: &[&str] = &[
    "filename",
    "part_id",
    "article_no",
    "article_description",
    "part_dimensions_x_mm",
    "part_dimensions_y_mm",
    "part_weight_kg",
    "part_area_mm2",
    "cutting_length_mm",
    "material_name",
    "material_thickness_mm",
    "material_cost_per_kg_eur",
    "machine_name",
    "machine_hour_cost_eur",
    "operator_hour_cost_eur",
    "overhead_rate_eur",
    "laser_time",
    "positioning_time",
    "setup_time",
    "pallet_changing_time",
    "total_processing_time",
    "power_consumption_kwh",
    "electricity_cost_per_kwh_eur",
    "electricity_cost_total_eur",
    "compressed_air_consumption_nm3",
    "compressed_air_cost_per_nm3_eur",
    "compressed_air_cost_total_eur",
    "oxygen_consumption_nm3",
    "oxygen_cost_per_nm3_eur",
    "oxygen_cost_total_eur",
    "nitrogen_consumption_nm3",
    "nitrogen_cost_per_nm3_eur",
    "nitrogen_cost_total_eur",
    "argon_consumption_nm3",
    "argon_cost_per_nm3_eur",
    "argon_cost_total_eur",
    "sheet_dimensions_x_mm",
    "sheet_dimensions_y_mm",
    "parts_per_sheet",
    "material_utilization_percent",
    "waste_percent",
    "material_consumption_m2",
    "net_cost_per_piece_eur",
    "gross_cost_per_piece_eur",
    "cost_qty_1_eur",
    "cost_qty_10_eur",
    "cost_qty_100_eur",
    "cost_qty_500_eur",
    "currency",
    "calculation_date",
    "author_version",
];

/// Render a record as one row matching [`COLUMNS`].
pub fn record_row(r: &CalculationRecord) -> Vec<String> {
    let mut row = vec![
        r.filename.clone(),
        r.part_id.clone(),
        r.article_no.clone(),
        r.article_description.clone(),
    ];
    row.extend(
        [
            r.part_dimensions_x,
            r.part_dimensions_y,
            r.part_weight,
            r.part_area,
            r.cutting_length,
        ]
        .map(|v| v.to_string()),
    );
    row.push(r.material_name.clone());
    row.push(r.material_thickness.to_string());
    row.push(r.material_cost_per_kg.to_string());
    row.push(r.machine_name.clone());
    row.extend(
        [r.machine_hour_cost, r.operator_hour_cost, r.overhead_rate].map(|v| v.to_string()),
    );
    row.extend(
        [
            &r.laser_time,
            &r.positioning_time,
            &r.setup_time,
            &r.pallet_changing_time,
            &r.total_processing_time,
        ]
        .map(|t| t.clone()),
    );
    for usage in [
        &r.electricity,
        &r.compressed_air,
        &r.oxygen,
        &r.nitrogen,
        &r.argon,
    ] {
        row.push(usage.consumption.to_string());
        row.push(usage.unit_cost.to_string());
        row.push(usage.total_cost.to_string());
    }
    row.push(r.sheet_dimensions_x.to_string());
    row.push(r.sheet_dimensions_y.to_string());
    row.push(r.parts_per_sheet.to_string());
    row.extend(
        [
            r.material_utilization,
            r.waste_percentage,
            r.material_consumption,
            r.net_cost_per_piece,
            r.gross_cost_per_piece,
            r.cost_qty_1,
            r.cost_qty_10,
            r.cost_qty_100,
            r.cost_qty_500,
        ]
        .map(|v| v.to_string()),
    );
    row.push(r.currency.clone());
    row.push(r.calculation_date.clone());
    row.push(r.author_version.clone());
    row
}

/// Write a header row and one row per record.
pub fn write_csv<W: Write>(records: &[CalculationRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMNS)?;
    for record in records {
        csv.write_record(record_row(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the table to a file.
pub fn write_csv_file(records: &[CalculationRecord], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(records, file)
}

/// Write the records as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[CalculationRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_matches_columns() {
        let record = CalculationRecord::new("a.cprj");
        let row = record_row(&record);
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row[0], "a.cprj");
    }

    #[test]
    fn test_row_column_alignment() {
        let mut record = CalculationRecord::new("a.cprj");
        record.nitrogen.consumption = 0.3;
        record.parts_per_sheet = 12;
        record.cost_qty_500 = 1.05;
        record.currency = "CHF".to_string();
        record.laser_time = "00:30:00".to_string();

        let row = record_row(&record);
        let cell = |name: &str| {
            let idx = COLUMNS.iter().position(|c| *c == name).unwrap();
            row[idx].clone()
        };
        assert_eq!(cell("nitrogen_consumption_nm3"), "0.3");
        assert_eq!(cell("parts_per_sheet"), "12");
        assert_eq!(cell("cost_qty_500_eur"), "1.05");
        assert_eq!(cell("currency"), "CHF");
        assert_eq!(cell("laser_time"), "00:30:00");
        assert_eq!(cell("argon_consumption_nm3"), "0");
    }

    #[test]
    fn test_write_csv_header_only() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("filename,part_id,article_no"));
    }

    #[test]
    fn test_write_csv_quotes_commas() {
        let mut record = CalculationRecord::new("a.cprj");
        record.article_description = "Bracket, left".to_string();
        let mut out = Vec::new();
        write_csv(&[record], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Bracket, left\""));
    }

    #[test]
    fn test_write_json() {
        let record = CalculationRecord::new("a.cprj");
        let mut out = Vec::new();
        write_json(&[record], &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["filename"], "a.cprj");
        assert_eq!(value[0]["nitrogen"]["consumption"], 0.0);
    }
}
