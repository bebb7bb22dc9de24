//! Data model for extracted calculation results.

mod record;

pub use record::{CalculationRecord, UtilityUsage};
