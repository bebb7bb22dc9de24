//! Derived energy and gas consumption.

mod classify;
mod consumption;

pub use classify::{MaterialClass, MaterialClassifier};
pub use consumption::{AssistGas, ConsumptionCalculator, PowerRatings, UnitCosts};
