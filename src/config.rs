//! Configuration constants and settings for extraction.

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Duration string used when a time field is absent or unparsable.
pub const ZERO_DURATION: &str = "00:00:00";

/// Quantity breakpoints exposed as scale-price columns.
pub const SCALE_BREAKPOINTS: [u32; 4] = [1, 10, 100, 500];

/// Currency reported when the document does not declare one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Part type attribute marking a manufactured part.
pub const DEFAULT_PART_TYPE: &str = "sheetmetalpart";

/// ProcessingTechnology value carried by the order/root node.
pub const ROOT_TECHNOLOGY_MARKER: &str = "NONE";

/// Compressed air drawn per laser-hour (Nm³/h).
pub const COMPRESSED_AIR_PER_HOUR: f64 = 10.0;

/// Below this thickness (mm) oxygen is assumed for non-stainless material.
pub const OXYGEN_THICKNESS_THRESHOLD: f64 = 3.0;

/// Consumption rate proportional to sheet thickness, clamped to a range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasRate {
    /// Nm³ per laser-hour per mm of thickness.
    pub per_mm: f64,
    /// Lower bound in Nm³ per laser-hour.
    pub min: f64,
    /// Upper bound in Nm³ per laser-hour.
    pub max: f64,
}

impl GasRate {
    /// Hourly rate for the given thickness.
    pub fn hourly(&self, thickness: f64) -> f64 {
        (thickness * self.per_mm).min(self.max).max(self.min)
    }
}

/// Rate constants for derived consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionRates {
    /// Compressed air per laser-hour (Nm³/h).
    pub compressed_air_per_hour: f64,
    /// Nitrogen rate for stainless material.
    pub nitrogen: GasRate,
    /// Oxygen rate for carbon steel and thin sheets.
    pub oxygen: GasRate,
    /// Thickness (mm) under which oxygen is used for unclassified material.
    pub oxygen_thickness_threshold: f64,
}

impl Default for ConsumptionRates {
    fn default() -> Self {
        Self {
            compressed_air_per_hour: COMPRESSED_AIR_PER_HOUR,
            nitrogen: GasRate {
                per_mm: 0.3,
                min: 0.5,
                max: 3.0,
            },
            oxygen: GasRate {
                per_mm: 0.2,
                min: 0.3,
                max: 2.0,
            },
            oxygen_thickness_threshold: OXYGEN_THICKNESS_THRESHOLD,
        }
    }
}

/// Substring markers used to classify material names.
///
/// Matching is case-insensitive. These are heuristics tuned to the naming
/// seen in practice (`1.4301` style alloy codes, English class names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialRules {
    /// Markers for stainless steel, including alloy-code prefixes.
    pub stainless_markers: Vec<String>,
    /// Markers for carbon/structural steel.
    pub carbon_markers: Vec<String>,
}

impl Default for MaterialRules {
    fn default() -> Self {
        Self {
            stainless_markers: vec!["stainless".to_string(), "1.43".to_string()],
            carbon_markers: vec!["carbon".to_string()],
        }
    }
}

/// Extraction settings passed explicitly through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// `type` attribute value of manufactured `Part` elements.
    pub part_type: String,
    /// Article numbers that denote the order itself, across locales.
    pub order_synonyms: Vec<String>,
    /// ProcessingTechnology value of the root/order pseudo-part.
    pub root_technology_marker: String,
    /// Currency when `Options@BaseCurrency` is missing.
    pub default_currency: String,
    /// Derived consumption rates.
    pub rates: ConsumptionRates,
    /// Material classification markers.
    pub materials: MaterialRules,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            part_type: DEFAULT_PART_TYPE.to_string(),
            order_synonyms: vec![
                "order".to_string(),
                "pedido".to_string(),
                "auftrag".to_string(),
            ],
            root_technology_marker: ROOT_TECHNOLOGY_MARKER.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            rates: ConsumptionRates::default(),
            materials: MaterialRules::default(),
        }
    }
}

impl ExtractConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ExtractError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check whether an article number names the order rather than a part.
    pub fn is_order_synonym(&self, article_no: &str) -> bool {
        let article_no = article_no.trim();
        self.order_synonyms
            .iter()
            .any(|s| s.eq_ignore_ascii_case(article_no))
    }

    /// Check whether a ProcessingTechnology value marks the root node.
    pub fn is_root_technology(&self, technology: &str) -> bool {
        technology
            .trim()
            .eq_ignore_ascii_case(&self.root_technology_marker)
    }
}
