//! Material classification for assist gas selection.

use crate::config::MaterialRules;

/// Coarse material class derived from a material name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialClass {
    Stainless,
    CarbonSteel,
    Unknown,
}

/// Strategy for classifying free-text material names.
pub trait MaterialClassifier {
    fn classify(&self, material_name: &str) -> MaterialClass;
}

impl MaterialClassifier for MaterialRules {
    fn classify(&self, material_name: &str) -> MaterialClass {
        let name = material_name.to_lowercase();
        let contains_any = |markers: &[String]| {
            markers
                .iter()
                .filter(|m| !m.is_empty())
                .any(|m| name.contains(&m.to_lowercase()))
        };

        if contains_any(&self.stainless_markers) {
            MaterialClass::Stainless
        } else if contains_any(&self.carbon_markers) {
            MaterialClass::CarbonSteel
        } else {
            MaterialClass::Unknown
        }
    }
}
