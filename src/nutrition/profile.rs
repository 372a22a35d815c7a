//! Nutrient profile
//!
//! A sparse set of nutrient amounts for one reference serving of a food.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::quantity::Quantity;
use super::units::Unit;

macro_rules! nutrients {
    ($($variant:ident => $key:literal, $label:literal, $unit:ident;)+) => {
        /// A nutrient tracked on food labels
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Nutrient {
            $($variant,)+
        }

        impl Nutrient {
            pub const ALL: &'static [Nutrient] = &[$(Nutrient::$variant,)+];

            /// Field name in nutrition records
            pub fn key(&self) -> &'static str {
                match self {
                    $(Nutrient::$variant => $key,)+
                }
            }

            /// Human readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $(Nutrient::$variant => $label,)+
                }
            }

            /// Unit labels conventionally report this nutrient in
            pub fn default_unit(&self) -> Unit {
                match self {
                    $(Nutrient::$variant => Unit::$unit,)+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(Nutrient::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

nutrients! {
    Calories => "calories", "Calories", Kilocalorie;
    TotalFat => "totalFat", "Total Fat", Gram;
    SaturatedFat => "saturatedFat", "Saturated Fat", Gram;
    MonounsaturatedFat => "monounsaturatedFat", "Monounsaturated Fat", Gram;
    PolyunsaturatedFat => "polyunsaturatedFat", "Polyunsaturated Fat", Gram;
    TransFat => "transFat", "Trans Fat", Gram;
    Cholesterol => "cholesterol", "Cholesterol", Milligram;
    Sodium => "sodium", "Sodium", Milligram;
    TotalCarbohydrate => "totalCarbohydrate", "Total Carbohydrate", Gram;
    DietaryFiber => "dietaryFiber", "Dietary Fiber", Gram;
    SolubleFiber => "solubleFiber", "Soluble Fiber", Gram;
    InsolubleFiber => "insolubleFiber", "Insoluble Fiber", Gram;
    TotalSugars => "totalSugars", "Total Sugars", Gram;
    AddedSugars => "addedSugars", "Added Sugars", Gram;
    SugarAlcohol => "sugarAlcohol", "Sugar Alcohol", Gram;
    Protein => "protein", "Protein", Gram;
    VitaminA => "vitaminA", "Vitamin A", Microgram;
    VitaminC => "vitaminC", "Vitamin C", Milligram;
    VitaminD => "vitaminD", "Vitamin D", Microgram;
    VitaminE => "vitaminE", "Vitamin E", Milligram;
    VitaminK => "vitaminK", "Vitamin K", Microgram;
    Thiamin => "thiamin", "Thiamin", Milligram;
    Riboflavin => "riboflavin", "Riboflavin", Milligram;
    Niacin => "niacin", "Niacin", Milligram;
    VitaminB6 => "vitaminB6", "Vitamin B6", Milligram;
    Folate => "folate", "Folate", Microgram;
    VitaminB12 => "vitaminB12", "Vitamin B12", Microgram;
    Biotin => "biotin", "Biotin", Microgram;
    PantothenicAcid => "pantothenicAcid", "Pantothenic Acid", Milligram;
    Choline => "choline", "Choline", Milligram;
    Calcium => "calcium", "Calcium", Milligram;
    Iron => "iron", "Iron", Milligram;
    Potassium => "potassium", "Potassium", Milligram;
    Phosphorus => "phosphorus", "Phosphorus", Milligram;
    Iodine => "iodine", "Iodine", Microgram;
    Magnesium => "magnesium", "Magnesium", Milligram;
    Zinc => "zinc", "Zinc", Milligram;
    Selenium => "selenium", "Selenium", Microgram;
    Copper => "copper", "Copper", Milligram;
    Manganese => "manganese", "Manganese", Milligram;
    Chromium => "chromium", "Chromium", Microgram;
    Molybdenum => "molybdenum", "Molybdenum", Microgram;
    Chloride => "chloride", "Chloride", Milligram;
    Caffeine => "caffeine", "Caffeine", Milligram;
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Nutrient amounts for one serving. Missing nutrients are unknown, not zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutrientProfile {
    values: BTreeMap<Nutrient, Quantity>,
}

impl NutrientProfile {
    /// A profile with no data at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The aggregation seed: 0 kcal and nothing else, so an empty sum still
    /// reports calories.
    pub fn zero() -> Self {
        Self::empty().with(Nutrient::Calories, Quantity::kilocalories(0.0))
    }

    pub fn with(mut self, nutrient: Nutrient, quantity: Quantity) -> Self {
        self.set(nutrient, quantity);
        self
    }

    pub fn set(&mut self, nutrient: Nutrient, quantity: Quantity) {
        self.values.insert(nutrient, quantity);
    }

    pub fn remove(&mut self, nutrient: Nutrient) -> Option<Quantity> {
        self.values.remove(&nutrient)
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<&Quantity> {
        self.values.get(&nutrient)
    }

    pub fn calories(&self) -> Option<Quantity> {
        self.get(Nutrient::Calories).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, &Quantity)> {
        self.values.iter().map(|(n, q)| (*n, q))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scale every present nutrient
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            values: self
                .values
                .iter()
                .map(|(n, q)| (*n, q.scaled(factor)))
                .collect(),
        }
    }

    /// Nutrient-by-nutrient sum, reported in this profile's units.
    ///
    /// A nutrient present on one side only passes through unchanged.
    pub fn add(&self, other: &NutrientProfile) -> Self {
        let mut values = self.values.clone();
        for (nutrient, theirs) in &other.values {
            match values.get_mut(nutrient) {
                Some(ours) => match ours.checked_add(theirs) {
                    Some(sum) => *ours = sum,
                    None => tracing::warn!(
                        "Skipping {} in {}: incompatible with {}",
                        nutrient,
                        theirs.unit,
                        ours.unit
                    ),
                },
                None => {
                    values.insert(*nutrient, *theirs);
                }
            }
        }
        Self { values }
    }
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, factor: f64) -> NutrientProfile {
        self.scaled(factor)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::zero(), |acc, p| acc + p)
    }
}

impl FromIterator<(Nutrient, Quantity)> for NutrientProfile {
    fn from_iter<I: IntoIterator<Item = (Nutrient, Quantity)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for NutrientProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (nutrient, quantity) in &self.values {
            map.serialize_entry(nutrient.key(), quantity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NutrientProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut profile = NutrientProfile::empty();
        for (key, value) in raw {
            if value.is_null() {
                continue;
            }
            let Some(nutrient) = Nutrient::from_key(&key) else {
                tracing::warn!("Ignoring unknown nutrient '{}'", key);
                continue;
            };
            match Quantity::deserialize(&value) {
                Ok(quantity) => profile.set(nutrient, quantity),
                Err(e) => tracing::warn!("Ignoring nutrient '{}': {}", key, e),
            }
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> NutrientProfile {
        NutrientProfile::empty()
            .with(Nutrient::Calories, Quantity::kilocalories(200.0))
            .with(Nutrient::TotalFat, Quantity::grams(10.0))
            .with(Nutrient::Sodium, Quantity::new(150.0, Unit::Milligram))
    }

    #[test]
    fn test_nutrient_keys_round_trip() {
        assert!(Nutrient::ALL.len() >= 40);
        for nutrient in Nutrient::ALL {
            assert_eq!(Nutrient::from_key(nutrient.key()), Some(*nutrient));
        }
    }

    #[test]
    fn test_zero_profile() {
        let zero = NutrientProfile::zero();
        assert_eq!(zero.len(), 1);
        assert_eq!(zero.calories(), Some(Quantity::kilocalories(0.0)));

        let doubled = zero.add(&NutrientProfile::zero());
        assert_eq!(doubled.calories(), Some(Quantity::kilocalories(0.0)));
    }

    #[test]
    fn test_scaled_keeps_absent_absent() {
        let scaled = sample().scaled(2.0);
        assert_eq!(scaled.calories(), Some(Quantity::kilocalories(400.0)));
        assert_eq!(scaled.get(Nutrient::TotalFat), Some(&Quantity::grams(20.0)));
        assert_eq!(scaled.get(Nutrient::Protein), None);
        assert_eq!(scaled.len(), 3);
    }

    #[test]
    fn test_add_merges_per_nutrient() {
        let other = NutrientProfile::empty()
            .with(Nutrient::Calories, Quantity::new(418.4, Unit::Kilojoule))
            .with(Nutrient::Protein, Quantity::grams(5.0));

        let sum = sample().add(&other);

        let calories = sum.calories().unwrap();
        assert_eq!(calories.unit, Unit::Kilocalorie);
        assert!((calories.amount - 300.0).abs() < 1e-9);
        assert_eq!(sum.get(Nutrient::TotalFat), Some(&Quantity::grams(10.0)));
        assert_eq!(sum.get(Nutrient::Protein), Some(&Quantity::grams(5.0)));
        assert_eq!(sum.get(Nutrient::Iron), None);
    }

    #[test]
    fn test_add_zero_matches_identity_scale() {
        let p = sample();
        assert_eq!(
            p.add(&NutrientProfile::zero()).calories(),
            p.scaled(1.0).calories()
        );
    }

    #[test]
    fn test_add_skips_incompatible_units() {
        let odd = NutrientProfile::empty().with(Nutrient::TotalFat, Quantity::milliliters(5.0));
        let sum = sample().add(&odd);
        assert_eq!(sum.get(Nutrient::TotalFat), Some(&Quantity::grams(10.0)));
    }

    #[test]
    fn test_sum_is_seeded_at_zero() {
        let total: NutrientProfile = Vec::<NutrientProfile>::new().into_iter().sum();
        assert_eq!(total, NutrientProfile::zero());

        let total: NutrientProfile = vec![sample(), sample()].into_iter().sum();
        assert_eq!(total.calories(), Some(Quantity::kilocalories(400.0)));
    }

    #[test]
    fn test_record_round_trip() {
        let record = json!({
            "calories": {"amount": 200, "unit": "kcal"},
            "totalFat": {"amount": 10, "unit": "g"},
            "vitaminD": {"amount": 2, "unit": "mcg"},
            "protein": null,
            "glitter": {"amount": 1, "unit": "g"}
        });

        let profile: NutrientProfile = serde_json::from_value(record).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(
            profile.get(Nutrient::VitaminD),
            Some(&Quantity::new(2.0, Unit::Microgram))
        );

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["vitaminD"], json!({"amount": 2.0, "unit": "μg"}));
        let back: NutrientProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_record_skips_unreadable_quantities() {
        let record = json!({
            "calories": {"amount": 120, "unit": "kcal"},
            "vitaminA": {"amount": 500, "unit": "IU"},
            "sodium": "lots"
        });

        let profile: NutrientProfile = serde_json::from_value(record).unwrap();
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.calories(), Some(Quantity::kilocalories(120.0)));
        assert_eq!(profile.get(Nutrient::VitaminA), None);
    }
}
