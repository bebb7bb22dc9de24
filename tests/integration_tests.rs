//! Integration tests for result document extraction.
//!
//! Documents are built inline and mirror the layout of real calculation
//! results: an order-level `Part` with `ProcessingTechnology="NONE"` that
//! wraps the manufactured parts, plus order-wide header, operator and
//! nesting sections.

use cprj_summary::{
    extract_str, summarize_files, write_csv, CalculationRecord, ExtractConfig, COLUMNS,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

// ==================== Fixtures ====================

/// Everything but the parts.
fn order_document(parts: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<CalculationResult>
    <header>
        <datetime>2024-05-14T08:30:12</datetime>
        <author authorversion="4.2.1.7">Calculate</author>
    </header>
    <Options BaseCurrency="EUR"/>
    <OrderData>
        <Operator>
            <ElectricEnergyCosts><metric_qty>0,20</metric_qty></ElectricEnergyCosts>
            <CompressedAir><Costs><metric_qty>0.03</metric_qty></Costs></CompressedAir>
            <Oxygen><Costs><metric_qty>0.60</metric_qty></Costs></Oxygen>
            <Nitrogen><Costs><metric_qty>1.10</metric_qty></Costs></Nitrogen>
            <Argon><Costs><metric_qty>4.00</metric_qty></Costs></Argon>
        </Operator>
    </OrderData>
    <Part type="sheetmetalpart" ID="root" ProcessingTechnology="NONE">
        <ArticleNo>Order</ArticleNo>
        <Parts>
{parts}
        </Parts>
    </Part>
    <nesting>
        <allocation sheet-id="1.4301-2.0x3000x1500">
            <pos id="1"/><pos id="2"/><pos id="3"/><pos id="4"/>
        </allocation>
    </nesting>
    <sheetData>
        <materialConsumption><value>4,5</value></materialConsumption>
    </sheetData>
    <waste><value>18,25</value></waste>
</CalculationResult>"#
    )
}

fn part(id: &str, article: &str, material: &str, thickness: &str, laser_time: &str) -> String {
    format!(
        r#"            <Part type="sheetmetalpart" ID="{id}" ProcessingTechnology="LASER">
                <ArticleNo>{article}</ArticleNo>
                <ArticleDescription>Bracket {id}</ArticleDescription>
                <Material>
                    <MaterialName>{material}</MaterialName>
                    <MaterialThickness>{thickness}</MaterialThickness>
                </Material>
                <PartInformation>
                    <SizeX>120</SizeX><SizeY>80,5</SizeY>
                    <PartWeight>0.151</PartWeight><PartArea>9660</PartArea>
                    <CuttingLength>401.2</CuttingLength>
                </PartInformation>
                <WorkingStep>
                    <WorkStepName>TruLaser 3030 fiber</WorkStepName>
                    <WorkPlaceData>
                        <MachineHourCosts><Value><metric_qty>95.00</metric_qty></Value></MachineHourCosts>
                        <HourlyRate><Value><metric_qty>38.50</metric_qty></Value></HourlyRate>
                        <OverheadRate><metric_qty>12</metric_qty></OverheadRate>
                    </WorkPlaceData>
                    <TargetProcessingTimeData>
                        <LaserTime>{laser_time}</LaserTime>
                        <PositioningTime>00:00:42.120</PositioningTime>
                        <SetupTime>00:15:00</SetupTime>
                        <PalletChangingTime>00:00:30.5</PalletChangingTime>
                    </TargetProcessingTimeData>
                    <TargetProcessingTime>00:46:12.620</TargetProcessingTime>
                </WorkingStep>
                <LaserMachine>
                    <Power1Percent>0.5</Power1Percent>
                    <Power100Percent>4.5</Power100Percent>
                </LaserMachine>
                <SalesPrices>
                    <OrderPrice>
                        <NetcostsAPiece>5,00</NetcostsAPiece>
                        <GrosscostsAPiece>5.95</GrosscostsAPiece>
                    </OrderPrice>
                    <ScalePrices>
                        <ScalePriceEntry><Quantity>1</Quantity><NetcostsAPiece>3,45</NetcostsAPiece></ScalePriceEntry>
                        <ScalePriceEntry><Quantity>10</Quantity><NetcostsAPiece>2.80</NetcostsAPiece></ScalePriceEntry>
                        <ScalePriceEntry><Quantity>100</Quantity><NetcostsAPiece>1.90</NetcostsAPiece></ScalePriceEntry>
                    </ScalePrices>
                </SalesPrices>
            </Part>"#
    )
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn extract(xml: &str) -> Vec<CalculationRecord> {
    extract_str(xml, "order.cprj", &ExtractConfig::default())
        .expect("Should parse document")
        .records
}

// ==================== End-to-end scenarios ====================

#[test]
fn test_stainless_part_end_to_end() {
    let xml = order_document(&part("1", "P-001", "1.4301-20", "2.0", "00:30:00.000"));
    let records = extract(&xml);
    assert_eq!(records.len(), 1);
    let r = &records[0];

    assert_eq!(r.filename, "order.cprj");
    assert_eq!(r.part_id, "1");
    assert_eq!(r.article_no, "P-001");
    assert_eq!(r.laser_time, "00:30:00");

    // 0.5 h at a mean 2.5 kW
    assert!(approx(r.electricity.consumption, 1.25));
    assert!(approx(r.electricity.unit_cost, 0.20));
    assert!(approx(r.electricity.total_cost, 0.25));

    // 0.6 Nm³/h nitrogen for 2 mm stainless
    assert!(approx(r.nitrogen.consumption, 0.3));
    assert!(approx(r.nitrogen.total_cost, 0.33));
    assert_eq!(r.oxygen.consumption, 0.0);

    assert!(approx(r.compressed_air.consumption, 5.0));
    assert!(approx(r.compressed_air.total_cost, 0.15));

    assert_eq!(r.argon.consumption, 0.0);
    assert!(approx(r.argon.unit_cost, 4.0));
    assert_eq!(r.argon.total_cost, 0.0);
}

#[test]
fn test_order_only_document_yields_nothing() {
    let xml = order_document("");
    let extraction = extract_str(&xml, "empty-order.cprj", &ExtractConfig::default()).unwrap();
    assert!(extraction.records.is_empty());
    assert_eq!(extraction.excluded, 1);
}

#[test]
fn test_order_synonyms_never_emitted() {
    let parts = [
        part("1", "ORDER", "S235", "5", "00:10:00"),
        part("2", "pedido", "S235", "5", "00:10:00"),
        part("3", "Auftrag", "S235", "5", "00:10:00"),
        part("4", "P-004", "S235", "5", "00:10:00"),
    ]
    .join("\n");
    let records = extract(&order_document(&parts));
    let articles: Vec<&str> = records.iter().map(|r| r.article_no.as_str()).collect();
    assert_eq!(articles, vec!["P-004"]);
}

#[test]
fn test_multi_part_document_shares_order_fields() {
    let parts = [
        part("11", "P-011", "1.4301", "2.0", "00:30:00"),
        part("12", "P-012", "Carbon steel S235", "12", "01:00:00"),
        part("13", "P-013", "AlMg3", "5", "00:20:00"),
    ]
    .join("\n");
    let records = extract(&order_document(&parts));
    assert_eq!(records.len(), 3);

    let ids: Vec<&str> = records.iter().map(|r| r.part_id.as_str()).collect();
    assert_eq!(ids, vec!["11", "12", "13"]);

    for r in &records {
        assert_eq!(r.currency, "EUR");
        assert_eq!(r.calculation_date, "2024-05-14T08:30:12");
        assert_eq!(r.author_version, "4.2.1.7");
        assert_eq!(r.sheet_dimensions_x, 3000.0);
        assert_eq!(r.sheet_dimensions_y, 1500.0);
        assert_eq!(r.parts_per_sheet, 4);
        assert!(approx(r.material_consumption, 4.5));
        assert!(approx(r.waste_percentage, 18.25));
        assert!(approx(r.material_utilization, 81.75));
        assert!(r.oxygen.consumption == 0.0 || r.nitrogen.consumption == 0.0);
    }

    // Carbon steel: oxygen, clamped at 2.0 Nm³/h
    assert!(approx(records[1].oxygen.consumption, 2.0));
    // Thick aluminium: no assist gas
    assert_eq!(records[2].oxygen.consumption, 0.0);
    assert_eq!(records[2].nitrogen.consumption, 0.0);
}

#[test]
fn test_part_fields_and_scale_prices() {
    let records = extract(&order_document(&part("1", "P-001", "S235", "2", "00:30:00")));
    let r = &records[0];

    assert_eq!(r.article_description, "Bracket 1");
    assert!(approx(r.part_dimensions_x, 120.0));
    assert!(approx(r.part_dimensions_y, 80.5));
    assert!(approx(r.cutting_length, 401.2));
    assert_eq!(r.machine_name, "TruLaser 3030 fiber");
    assert!(approx(r.machine_hour_cost, 95.0));
    assert!(approx(r.operator_hour_cost, 38.5));
    assert_eq!(r.positioning_time, "00:00:42");
    assert_eq!(r.pallet_changing_time, "00:00:30");
    assert_eq!(r.total_processing_time, "00:46:12");
    assert!(approx(r.net_cost_per_piece, 5.0));
    assert!(approx(r.gross_cost_per_piece, 5.95));

    // Scale entry for quantity 1 wins over the net cost per piece.
    assert!(approx(r.cost_qty_1, 3.45));
    assert!(approx(r.cost_qty_10, 2.8));
    assert!(approx(r.cost_qty_100, 1.9));
    assert_eq!(r.cost_qty_500, 0.0);
}

#[test]
fn test_stub_part_discarded_siblings_kept() {
    let stub = r#"            <Part type="sheetmetalpart" ID="2">
                <Material><MaterialName>S235</MaterialName></Material>
            </Part>"#;
    let parts = format!(
        "{}\n{}\n{}",
        part("1", "P-001", "S235", "2", "00:10:00"),
        stub,
        part("3", "P-003", "S235", "2", "00:10:00")
    );
    let extraction =
        extract_str(&order_document(&parts), "order.cprj", &ExtractConfig::default()).unwrap();
    let ids: Vec<&str> = extraction.records.iter().map(|r| r.part_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(extraction.discarded, 1);
}

#[test]
fn test_part_with_cost_but_no_article_is_kept() {
    let xml = order_document(
        r#"<Part type="sheetmetalpart" ID="9">
            <SalesPrices><OrderPrice><NetcostsAPiece>7.25</NetcostsAPiece></OrderPrice></SalesPrices>
        </Part>"#,
    );
    let records = extract(&xml);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].article_no, "");
    assert!(approx(records[0].cost_qty_1, 7.25));
    assert_eq!(records[0].laser_time, "00:00:00");
    assert_eq!(records[0].electricity.consumption, 0.0);
}

#[test]
fn test_contour_fallback_for_missing_dimensions() {
    let xml = order_document(
        r#"<Part type="sheetmetalpart" ID="5">
            <ArticleNo>P-005</ArticleNo>
            <PartInformation><SizeX>0</SizeX><SizeY>64</SizeY></PartInformation>
            <ApproxGeometry><outside><contour>
                <parameter_3><val>210,0</val></parameter_3>
                <parameter_4><val>99</val></parameter_4>
            </contour></outside></ApproxGeometry>
        </Part>"#,
    );
    let records = extract(&xml);
    assert!(approx(records[0].part_dimensions_x, 210.0));
    assert!(approx(records[0].part_dimensions_y, 64.0));
}

#[test]
fn test_custom_config() {
    let config: ExtractConfig = serde_json::from_str(
        r#"{"order_synonyms": ["commande"], "rates": {"compressed_air_per_hour": 20.0}}"#,
    )
    .unwrap();
    let parts = [
        part("1", "Commande", "S235", "2", "00:30:00"),
        part("2", "Order", "S235", "2", "00:30:00"),
    ]
    .join("\n");
    let records = extract_str(&order_document(&parts), "o.cprj", &config)
        .unwrap()
        .records;

    // "Order" is no longer a synonym, so part 2 is emitted.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].part_id, "2");
    assert!(approx(records[0].compressed_air.consumption, 10.0));
}

#[test]
fn test_malformed_document_is_an_error() {
    let result = extract_str("<CalculationResult><Part>", "bad.cprj", &ExtractConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_document_with_doctype() {
    let xml = order_document(&part("1", "P-001", "S235", "2", "00:30:00")).replacen(
        "<CalculationResult>",
        "<!DOCTYPE CalculationResult>\n<CalculationResult>",
        1,
    );
    let records = extract(&xml);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].article_no, "P-001");
}

#[test]
fn test_partial_laser_time_counts_as_zero() {
    let records = extract(&order_document(&part("1", "P-001", "1.4301", "2", "00:30")));
    assert_eq!(records[0].laser_time, "00:00:00");
    assert_eq!(records[0].electricity.consumption, 0.0);
    assert_eq!(records[0].nitrogen.consumption, 0.0);
}

// ==================== Batch aggregation ====================

#[test]
fn test_batch_preserves_order_and_skips_failures() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    };

    let first = write(
        "b-first.cprj",
        &order_document(&[
            part("1", "B-1", "1.4301", "2", "00:30:00"),
            part("2", "B-2", "1.4301", "2", "00:30:00"),
        ]
        .join("\n")),
    );
    let broken = write("broken.cprj", "<CalculationResult><Part></CalculationResult>");
    let empty = write("empty.cprj", "");
    let order_only = write("order-only.cprj", &order_document(""));
    let last = write(
        "a-last.cprj",
        &order_document(&part("7", "A-7", "S235", "2", "00:10:00")),
    );
    let missing = dir.path().join("missing.cprj");

    let summary = summarize_files(
        &[first, broken, empty, missing, order_only, last],
        &ExtractConfig::default(),
    );

    let rows: Vec<(&str, &str)> = summary
        .records
        .iter()
        .map(|r| (r.filename.as_str(), r.article_no.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("b-first.cprj", "B-1"),
            ("b-first.cprj", "B-2"),
            ("a-last.cprj", "A-7"),
        ]
    );

    assert_eq!(summary.stats.documents_processed, 3);
    assert_eq!(summary.stats.documents_skipped, 3);
    assert_eq!(summary.stats.records_emitted, 3);
    assert_eq!(summary.stats.parts_excluded, 3);
    assert_eq!(summary.multi_part_files(), vec![("b-first.cprj", 2)]);
}

#[test]
fn test_batch_decodes_declared_latin1() {
    let dir = tempfile::tempdir().unwrap();
    let xml = order_document(&part("1", "P-001", "S235", "2", "00:30:00"))
        .replacen("encoding=\"utf-8\"", "encoding=\"ISO-8859-1\"", 1)
        .replacen("Bracket 1", "Tr\u{e4}ger", 1);
    let latin1: Vec<u8> = xml.chars().map(|c| c as u32 as u8).collect();
    let path = dir.path().join("latin1.cprj");
    fs::write(&path, latin1).unwrap();

    let summary = summarize_files(&[path], &ExtractConfig::default());
    assert_eq!(summary.stats.documents_skipped, 0);
    assert_eq!(summary.records.len(), 1);
    assert_eq!(summary.records[0].article_description, "Tr\u{e4}ger");
}

#[test]
fn test_batch_skips_undecodable_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = order_document(&part("1", "P-001", "S235", "2", "00:30:00")).into_bytes();
    bytes.extend_from_slice(b"<!-- \xE4 -->");
    let path = dir.path().join("mojibake.cprj");
    fs::write(&path, bytes).unwrap();

    let summary = summarize_files(&[path], &ExtractConfig::default());
    assert!(summary.records.is_empty());
    assert_eq!(summary.stats.documents_skipped, 1);
}

// ==================== Export ====================

#[test]
fn test_csv_header() {
    let mut out = Vec::new();
    write_csv(&[], &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(text.trim_end(), @"filename,part_id,article_no,article_description,part_dimensions_x_mm,part_dimensions_y_mm,part_weight_kg,part_area_mm2,cutting_length_mm,material_name,material_thickness_mm,material_cost_per_kg_eur,machine_name,machine_hour_cost_eur,operator_hour_cost_eur,overhead_rate_eur,laser_time,positioning_time,setup_time,pallet_changing_time,total_processing_time,power_consumption_kwh,electricity_cost_per_kwh_eur,electricity_cost_total_eur,compressed_air_consumption_nm3,compressed_air_cost_per_nm3_eur,compressed_air_cost_total_eur,oxygen_consumption_nm3,oxygen_cost_per_nm3_eur,oxygen_cost_total_eur,nitrogen_consumption_nm3,nitrogen_cost_per_nm3_eur,nitrogen_cost_total_eur,argon_consumption_nm3,argon_cost_per_nm3_eur,argon_cost_total_eur,sheet_dimensions_x_mm,sheet_dimensions_y_mm,parts_per_sheet,material_utilization_percent,waste_percent,material_consumption_m2,net_cost_per_piece_eur,gross_cost_per_piece_eur,cost_qty_1_eur,cost_qty_10_eur,cost_qty_100_eur,cost_qty_500_eur,currency,calculation_date,author_version");
}

#[test]
fn test_csv_rows_follow_records() {
    let parts = [
        part("1", "P-001", "1.4301", "2", "00:30:00"),
        part("2", "P-002", "S235", "2", "00:30:00"),
    ]
    .join("\n");
    let records = extract(&order_document(&parts));

    let mut out = Vec::new();
    write_csv(&records, &mut out).unwrap();

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), COLUMNS.len());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    let article = headers.iter().position(|h| h == "article_no").unwrap();
    let nitrogen = headers.iter().position(|h| h == "nitrogen_consumption_nm3").unwrap();
    assert_eq!(&rows[0][article], "P-001");
    assert_eq!(&rows[0][nitrogen], "0.3");
    assert_eq!(&rows[1][nitrogen], "0");

    let net = headers.iter().position(|h| h == "net_cost_per_piece_eur").unwrap();
    let qty_1 = headers.iter().position(|h| h == "cost_qty_1_eur").unwrap();
    assert_eq!(&rows[0][net], "5");
    assert_eq!(&rows[0][qty_1], "3.45");
}
