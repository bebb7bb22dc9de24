//! Energy and gas consumption estimates.
//!
//! None of these figures exist in the source documents. They are derived
//! from the laser processing time, the machine's rated power and the
//! material, using the rates in [`ConsumptionRates`].

use crate::config::{ConsumptionRates, ExtractConfig};
use crate::model::{CalculationRecord, UtilityUsage};
use crate::parser::duration_to_hours;

use super::classify::{MaterialClass, MaterialClassifier};

/// Utility unit costs declared in the document's operator section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitCosts {
    /// Per kWh.
    pub electricity: f64,
    /// Per Nm³.
    pub compressed_air: f64,
    pub oxygen: f64,
    pub nitrogen: f64,
    pub argon: f64,
}

/// Rated laser power at 1% and 100% duty, in kW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerRatings {
    pub at_1_percent: f64,
    pub at_100_percent: f64,
}

impl PowerRatings {
    /// Mean of the two ratings, used as the average draw while cutting.
    pub fn mean_kw(&self) -> f64 {
        (self.at_1_percent + self.at_100_percent) / 2.0
    }
}

/// Cutting-assist gas chosen for a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistGas {
    Nitrogen,
    Oxygen,
    None,
}

/// Fills the consumption block of assembled records.
pub struct ConsumptionCalculator<'c> {
    rates: &'c ConsumptionRates,
    classifier: &'c dyn MaterialClassifier,
}

impl<'c> ConsumptionCalculator<'c> {
    pub fn new(rates: &'c ConsumptionRates, classifier: &'c dyn MaterialClassifier) -> Self {
        Self { rates, classifier }
    }

    /// Calculator using the configured rates and material markers.
    pub fn from_config(config: &'c ExtractConfig) -> Self {
        Self::new(&config.rates, &config.materials)
    }

    /// Select the assist gas for a material and thickness.
    pub fn assist_gas(&self, material_name: &str, thickness: f64) -> AssistGas {
        match self.classifier.classify(material_name) {
            MaterialClass::Stainless => AssistGas::Nitrogen,
            MaterialClass::CarbonSteel => AssistGas::Oxygen,
            MaterialClass::Unknown if thickness < self.rates.oxygen_thickness_threshold => {
                AssistGas::Oxygen
            }
            MaterialClass::Unknown => AssistGas::None,
        }
    }

    /// Price and estimate all utilities for `record`.
    ///
    /// Only the consumption block is written. Every consumption starts at
    /// zero and stays there when its inputs are missing.
    pub fn apply(
        &self,
        record: &mut CalculationRecord,
        costs: &UnitCosts,
        power: Option<PowerRatings>,
    ) {
        record.electricity = UtilityUsage::priced(costs.electricity);
        record.compressed_air = UtilityUsage::priced(costs.compressed_air);
        record.oxygen = UtilityUsage::priced(costs.oxygen);
        record.nitrogen = UtilityUsage::priced(costs.nitrogen);
        record.argon = UtilityUsage::priced(costs.argon);

        let laser_hours = duration_to_hours(&record.laser_time);
        if laser_hours <= 0.0 {
            return;
        }

        if let Some(power) = power {
            record.electricity.charge(power.mean_kw() * laser_hours);
        }

        record
            .compressed_air
            .charge(self.rates.compressed_air_per_hour * laser_hours);

        let thickness = record.material_thickness;
        match self.assist_gas(&record.material_name, thickness) {
            AssistGas::Nitrogen => {
                let rate = self.rates.nitrogen.hourly(thickness);
                record.nitrogen.charge(rate * laser_hours);
            }
            AssistGas::Oxygen => {
                let rate = self.rates.oxygen.hourly(thickness);
                record.oxygen.charge(rate * laser_hours);
            }
            AssistGas::None => {}
        }
    }
}
