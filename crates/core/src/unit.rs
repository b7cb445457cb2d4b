//! Units of measure for ingredient quantities.

use serde::{Deserialize, Serialize};

/// Unit of measure for an ingredient.
///
/// Quantities throughout the engine are integers in the ingredient's base
/// unit; the unit itself is display/configuration metadata.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "gr")]
    Grams,
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "un")]
    Units,
    #[serde(rename = "lt")]
    Liters,
}

impl Unit {
    /// Short code used in serialized form and labels.
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Grams => "gr",
            Unit::Kilograms => "kg",
            Unit::Units => "un",
            Unit::Liters => "lt",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_serialize_to_short_codes() {
        assert_eq!(serde_json::to_string(&Unit::Grams).unwrap(), "\"gr\"");
        assert_eq!(serde_json::to_string(&Unit::Liters).unwrap(), "\"lt\"");
    }
}
