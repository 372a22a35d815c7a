//! Unit types and conversion constants
//!
//! Provides the measurement unit vocabulary, its dimensions and the standard
//! conversion factors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ServingError;

/// Measurement dimension of a unit. Units only convert within one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Volume,
    Energy,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Mass => "mass",
            Dimension::Volume => "volume",
            Dimension::Energy => "energy",
        }
    }

    /// Name of the reference value a food declares for this dimension
    pub fn reference_label(&self) -> &'static str {
        match self {
            Dimension::Mass => "mass",
            Dimension::Volume => "volume",
            Dimension::Energy => "calories",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A measurement unit. Volume units are US customary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    // Mass
    Gram,
    Milligram,
    Microgram,
    Kilogram,
    Ounce,
    Pound,
    // Volume
    Milliliter,
    Liter,
    Cup,
    Tablespoon,
    Teaspoon,
    FluidOunce,
    Pint,
    Quart,
    Gallon,
    // Energy
    Kilocalorie,
    Calorie,
    Kilojoule,
    Joule,
    WattHour,
}

impl Unit {
    pub const ALL: [Unit; 20] = [
        Unit::Gram,
        Unit::Milligram,
        Unit::Microgram,
        Unit::Kilogram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Cup,
        Unit::Tablespoon,
        Unit::Teaspoon,
        Unit::FluidOunce,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
        Unit::Kilocalorie,
        Unit::Calorie,
        Unit::Kilojoule,
        Unit::Joule,
        Unit::WattHour,
    ];

    /// Canonical symbol, used for display and records
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Milligram => "mg",
            Unit::Microgram => "μg",
            Unit::Kilogram => "kg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Milliliter => "mL",
            Unit::Liter => "L",
            Unit::Cup => "cup (US)",
            Unit::Tablespoon => "tbsp (US)",
            Unit::Teaspoon => "tsp (US)",
            Unit::FluidOunce => "fl oz (US)",
            Unit::Pint => "pt (US)",
            Unit::Quart => "qt (US)",
            Unit::Gallon => "gal (US)",
            Unit::Kilocalorie => "kcal",
            Unit::Calorie => "cal",
            Unit::Kilojoule => "kJ",
            Unit::Joule => "J",
            Unit::WattHour => "Wh",
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Gram
            | Unit::Milligram
            | Unit::Microgram
            | Unit::Kilogram
            | Unit::Ounce
            | Unit::Pound => Dimension::Mass,
            Unit::Milliliter
            | Unit::Liter
            | Unit::Cup
            | Unit::Tablespoon
            | Unit::Teaspoon
            | Unit::FluidOunce
            | Unit::Pint
            | Unit::Quart
            | Unit::Gallon => Dimension::Volume,
            Unit::Kilocalorie
            | Unit::Calorie
            | Unit::Kilojoule
            | Unit::Joule
            | Unit::WattHour => Dimension::Energy,
        }
    }

    /// Size of one of this unit in its dimension's base unit (g, mL or J)
    pub fn base_factor(&self) -> f64 {
        match self.dimension() {
            Dimension::Mass => grams_per_unit(*self),
            Dimension::Volume => ml_per_unit(*self),
            Dimension::Energy => joules_per_unit(*self),
        }
        .unwrap_or(1.0)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon (US)
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon (US)
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per fluid ounce (US)
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;

// ============================================================================
// Mass Conversion Constants (to grams)
// ============================================================================

/// Grams per microgram
pub const G_PER_MCG: f64 = 0.000_001;
/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Energy Conversion Constants (to joules)
// ============================================================================

pub const J_PER_KCAL: f64 = 4184.0;
pub const J_PER_CAL: f64 = 4.184;
pub const J_PER_KJ: f64 = 1000.0;
pub const J_PER_WH: f64 = 3600.0;

/// Conversion factor to grams for a mass unit
pub fn grams_per_unit(unit: Unit) -> Option<f64> {
    match unit {
        Unit::Gram => Some(1.0),
        Unit::Milligram => Some(G_PER_MG),
        Unit::Microgram => Some(G_PER_MCG),
        Unit::Kilogram => Some(G_PER_KG),
        Unit::Ounce => Some(G_PER_OZ),
        Unit::Pound => Some(G_PER_LB),
        _ => None,
    }
}

/// Conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: Unit) -> Option<f64> {
    match unit {
        Unit::Milliliter => Some(1.0),
        Unit::Liter => Some(ML_PER_LITER),
        Unit::Cup => Some(ML_PER_CUP),
        Unit::Tablespoon => Some(ML_PER_TBSP),
        Unit::Teaspoon => Some(ML_PER_TSP),
        Unit::FluidOunce => Some(ML_PER_FL_OZ),
        Unit::Pint => Some(ML_PER_PINT),
        Unit::Quart => Some(ML_PER_QUART),
        Unit::Gallon => Some(ML_PER_GALLON),
        _ => None,
    }
}

/// Joules per energy unit. Kept apart from the physical tables: food
/// calories are a nutrition convention.
pub fn joules_per_unit(unit: Unit) -> Option<f64> {
    match unit {
        Unit::Kilocalorie => Some(J_PER_KCAL),
        Unit::Calorie => Some(J_PER_CAL),
        Unit::Kilojoule => Some(J_PER_KJ),
        Unit::Joule => Some(1.0),
        Unit::WattHour => Some(J_PER_WH),
        _ => None,
    }
}

// ============================================================================
// Unit Recognition
// ============================================================================

/// Normalize a unit spelling before lookup.
///
/// Collapses runs of whitespace (older records carry "tbsp  (US)"), maps the
/// micro sign and "mcg" spellings onto one microgram form and lowercases.
pub fn normalize_unit(unit: &str) -> String {
    let collapsed = unit.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = collapsed.to_lowercase();

    // "( us )" -> "(us)"
    let lower = lower.replace("( ", "(").replace(" )", ")");

    match lower.as_str() {
        "μg" | "µg" | "mcg" | "ug" => "μg".to_string(),
        _ => lower,
    }
}

/// Look up a unit by any accepted spelling
pub fn parse_unit(unit: &str) -> Option<Unit> {
    let normalized = normalize_unit(unit);
    let base = normalized
        .strip_suffix("(us)")
        .map(str::trim_end)
        .unwrap_or(&normalized);

    let parsed = match base {
        "g" | "gram" | "grams" => Unit::Gram,
        "mg" | "milligram" | "milligrams" => Unit::Milligram,
        "μg" | "microgram" | "micrograms" => Unit::Microgram,
        "kg" | "kilogram" | "kilograms" => Unit::Kilogram,
        "oz" | "ounce" | "ounces" => Unit::Ounce,
        "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Milliliter,
        "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
        "cup" | "cups" => Unit::Cup,
        "tbsp" | "tablespoon" | "tablespoons" => Unit::Tablespoon,
        "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
        "fl oz" | "fl-oz" | "floz" | "fluid ounce" | "fluid ounces" => Unit::FluidOunce,
        "pt" | "pint" | "pints" => Unit::Pint,
        "qt" | "quart" | "quarts" => Unit::Quart,
        "gal" | "gallon" | "gallons" => Unit::Gallon,
        "kcal" | "kilocalorie" | "kilocalories" | "calories" => Unit::Kilocalorie,
        "cal" | "calorie" => Unit::Calorie,
        "kj" | "kilojoule" | "kilojoules" => Unit::Kilojoule,
        "j" | "joule" | "joules" => Unit::Joule,
        "wh" | "watt-hour" | "watt-hours" => Unit::WattHour,
        _ => return None,
    };

    Some(parsed)
}

impl FromStr for Unit {
    type Err = ServingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s).ok_or_else(|| ServingError::UnknownUnit(s.to_string()))
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mass_units() {
        assert_eq!(parse_unit("g"), Some(Unit::Gram));
        assert_eq!(parse_unit("grams"), Some(Unit::Gram));
        assert_eq!(parse_unit("oz"), Some(Unit::Ounce));
        assert_eq!(parse_unit("lbs"), Some(Unit::Pound));
        assert_eq!(parse_unit("KG"), Some(Unit::Kilogram));
    }

    #[test]
    fn test_microgram_spellings() {
        assert_eq!(parse_unit("μg"), Some(Unit::Microgram));
        assert_eq!(parse_unit("µg"), Some(Unit::Microgram));
        assert_eq!(parse_unit("mcg"), Some(Unit::Microgram));
        assert_eq!(Unit::Microgram.symbol(), "μg");
    }

    #[test]
    fn test_parse_volume_units() {
        assert_eq!(parse_unit("mL"), Some(Unit::Milliliter));
        assert_eq!(parse_unit("L"), Some(Unit::Liter));
        assert_eq!(parse_unit("cup"), Some(Unit::Cup));
        assert_eq!(parse_unit("cup (US)"), Some(Unit::Cup));
        assert_eq!(parse_unit("tbsp  (US)"), Some(Unit::Tablespoon));
        assert_eq!(parse_unit("fl oz (US)"), Some(Unit::FluidOunce));
        assert_eq!(parse_unit("fl-oz"), Some(Unit::FluidOunce));
        assert_eq!(parse_unit("gal"), Some(Unit::Gallon));
    }

    #[test]
    fn test_parse_energy_units() {
        assert_eq!(parse_unit("kcal"), Some(Unit::Kilocalorie));
        assert_eq!(parse_unit("cal"), Some(Unit::Calorie));
        assert_eq!(parse_unit("kJ"), Some(Unit::Kilojoule));
        assert_eq!(parse_unit("J"), Some(Unit::Joule));
        assert_eq!(parse_unit("Wh"), Some(Unit::WattHour));
    }

    #[test]
    fn test_parse_unknown_units() {
        assert_eq!(parse_unit("scoop"), None);
        assert_eq!(parse_unit(""), None);
        assert!(matches!(
            "patty".parse::<Unit>(),
            Err(ServingError::UnknownUnit(u)) if u == "patty"
        ));
    }

    #[test]
    fn test_every_symbol_parses_back() {
        for unit in Unit::ALL {
            assert_eq!(parse_unit(unit.symbol()), Some(unit), "{}", unit);
        }
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(Unit::Pound.dimension(), Dimension::Mass);
        assert_eq!(Unit::Quart.dimension(), Dimension::Volume);
        assert_eq!(Unit::WattHour.dimension(), Dimension::Energy);
    }

    #[test]
    fn test_factor_tables_are_per_dimension() {
        assert_eq!(grams_per_unit(Unit::Ounce), Some(G_PER_OZ));
        assert_eq!(grams_per_unit(Unit::Cup), None);
        assert_eq!(ml_per_unit(Unit::Tablespoon), Some(ML_PER_TBSP));
        assert_eq!(ml_per_unit(Unit::Gram), None);
        assert_eq!(joules_per_unit(Unit::Kilocalorie), Some(4184.0));
        assert_eq!(joules_per_unit(Unit::Milliliter), None);
    }

    #[test]
    fn test_unit_serde() {
        let json = serde_json::to_string(&Unit::Tablespoon).unwrap();
        assert_eq!(json, "\"tbsp (US)\"");
        let unit: Unit = serde_json::from_str("\"tbsp  (US)\"").unwrap();
        assert_eq!(unit, Unit::Tablespoon);
        assert!(serde_json::from_str::<Unit>("\"handful\"").is_err());
    }
}
