//! Canonical waste-type catalog and category matching.
//!
//! Every category/waste-type comparison in the crate goes through this
//! module: raw bin categories normalize via [`WasteType::from_code`], and
//! schedule acceptance checks go through [`accepts`]. Matching is
//! case-insensitive exact membership, never substring or fuzzy.

use serde::{Deserialize, Serialize};

/// Icon shown for categories that do not normalize to a known waste type.
pub const UNKNOWN_ICON: &str = "help-circle";
/// Color shown for categories that do not normalize to a known waste type.
pub const UNKNOWN_COLOR: &str = "#9E9E9E";

/// The fixed set of waste categories the platform collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    Plastic,
    Paper,
    Organic,
    Glass,
    Metal,
    Electronic,
    Hazardous,
    General,
}

impl WasteType {
    /// All known waste types, in catalog order.
    pub const ALL: [WasteType; 8] = [
        WasteType::Plastic,
        WasteType::Paper,
        WasteType::Organic,
        WasteType::Glass,
        WasteType::Metal,
        WasteType::Electronic,
        WasteType::Hazardous,
        WasteType::General,
    ];

    /// Normalize a raw category string to a waste type.
    ///
    /// Lookup is case-insensitive against the fixed table; anything outside
    /// it returns `None`, which downstream code treats as "matches no
    /// schedule anywhere".
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plastic" => Some(WasteType::Plastic),
            "paper" => Some(WasteType::Paper),
            "organic" => Some(WasteType::Organic),
            "glass" => Some(WasteType::Glass),
            "metal" => Some(WasteType::Metal),
            "electronic" => Some(WasteType::Electronic),
            "hazardous" => Some(WasteType::Hazardous),
            "general" => Some(WasteType::General),
            _ => None,
        }
    }

    /// Canonical lowercase identifier.
    pub fn code(&self) -> &'static str {
        match self {
            WasteType::Plastic => "plastic",
            WasteType::Paper => "paper",
            WasteType::Organic => "organic",
            WasteType::Glass => "glass",
            WasteType::Metal => "metal",
            WasteType::Electronic => "electronic",
            WasteType::Hazardous => "hazardous",
            WasteType::General => "general",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            WasteType::Plastic => "Plastic",
            WasteType::Paper => "Paper",
            WasteType::Organic => "Organic",
            WasteType::Glass => "Glass",
            WasteType::Metal => "Metal",
            WasteType::Electronic => "Electronic",
            WasteType::Hazardous => "Hazardous",
            WasteType::General => "General",
        }
    }

    /// Icon name used by the mobile clients.
    pub fn icon(&self) -> &'static str {
        match self {
            WasteType::Plastic => "bottle-soda",
            WasteType::Paper => "newspaper-variant",
            WasteType::Organic => "leaf",
            WasteType::Glass => "glass-fragile",
            WasteType::Metal => "magnet",
            WasteType::Electronic => "battery",
            WasteType::Hazardous => "biohazard",
            WasteType::General => "trash-can",
        }
    }

    /// Display color (hex) used by the mobile clients.
    pub fn color(&self) -> &'static str {
        match self {
            WasteType::Plastic => "#2196F3",
            WasteType::Paper => "#795548",
            WasteType::Organic => "#4CAF50",
            WasteType::Glass => "#00BCD4",
            WasteType::Metal => "#607D8B",
            WasteType::Electronic => "#FF9800",
            WasteType::Hazardous => "#F44336",
            WasteType::General => "#757575",
        }
    }
}

impl std::fmt::Display for WasteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Case-insensitive set membership of a waste type in a schedule's accepted
/// list.
pub fn accepts(accepted: &[String], waste: WasteType) -> bool {
    accepted
        .iter()
        .any(|code| code.trim().eq_ignore_ascii_case(waste.code()))
}
