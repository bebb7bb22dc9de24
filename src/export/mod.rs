//! Tabular export of extracted records.

mod table;

pub use table::{record_row, write_csv, write_csv_file, write_json, COLUMNS};
