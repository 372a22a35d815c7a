//! Serving size
//!
//! How much of a food is being asked about: a number of servings, an amount
//! by mass, volume or energy, or a count of a food's own custom size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::quantity::Quantity;
use super::units::{parse_unit, Dimension};
use crate::error::ServingError;

/// A requested amount of food
#[derive(Debug, Clone, PartialEq)]
pub enum ServingSize {
    /// A number of reference servings
    Servings(f64),
    Mass(Quantity),
    Volume(Quantity),
    Energy(Quantity),
    /// `amount` of the custom size called `name`, e.g. 2 "cookie"
    Custom { name: String, amount: f64 },
}

impl Default for ServingSize {
    fn default() -> Self {
        ServingSize::Servings(1.0)
    }
}

impl ServingSize {
    pub fn servings(count: f64) -> Self {
        ServingSize::Servings(count)
    }

    pub fn mass(quantity: Quantity) -> Self {
        ServingSize::Mass(quantity)
    }

    pub fn volume(quantity: Quantity) -> Self {
        ServingSize::Volume(quantity)
    }

    pub fn energy(quantity: Quantity) -> Self {
        ServingSize::Energy(quantity)
    }

    pub fn custom(name: impl Into<String>, amount: f64) -> Self {
        ServingSize::Custom {
            name: name.into(),
            amount,
        }
    }

    /// Bare magnitude, whatever the variant
    pub fn amount(&self) -> f64 {
        match self {
            ServingSize::Servings(count) => *count,
            ServingSize::Mass(q) | ServingSize::Volume(q) | ServingSize::Energy(q) => q.amount,
            ServingSize::Custom { amount, .. } => *amount,
        }
    }

    /// Same variant and unit (or name) with the magnitude multiplied
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            ServingSize::Servings(count) => ServingSize::Servings(count * factor),
            ServingSize::Mass(q) => ServingSize::Mass(q.scaled(factor)),
            ServingSize::Volume(q) => ServingSize::Volume(q.scaled(factor)),
            ServingSize::Energy(q) => ServingSize::Energy(q.scaled(factor)),
            ServingSize::Custom { name, amount } => ServingSize::Custom {
                name: name.clone(),
                amount: amount * factor,
            },
        }
    }

    /// Record discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            ServingSize::Servings(_) => "servings",
            ServingSize::Mass(_) => "mass",
            ServingSize::Volume(_) => "volume",
            ServingSize::Energy(_) => "energy",
            ServingSize::Custom { .. } => "customSize",
        }
    }

    /// Parse a serving size record.
    ///
    /// Returns `None` for any record that lacks the fields its kind needs.
    /// Older records spell `kind`/`amount` as `type`/`value`.
    pub fn from_record(record: &Value) -> Option<Self> {
        let fields = record.as_object()?;
        let kind = field(fields, "kind", "type")?.as_str()?;
        let amount = field(fields, "amount", "value");

        match kind {
            "servings" => amount?.as_f64().map(ServingSize::Servings),
            "mass" => quantity_in(amount?, Dimension::Mass).map(ServingSize::Mass),
            "volume" => quantity_in(amount?, Dimension::Volume).map(ServingSize::Volume),
            "energy" => quantity_in(amount?, Dimension::Energy).map(ServingSize::Energy),
            "customSize" => {
                let name = fields.get("name")?.as_str()?;
                let amount = amount?.as_f64()?;
                Some(ServingSize::custom(name, amount))
            }
            _ => None,
        }
    }

    pub fn to_record(&self) -> Value {
        match self {
            ServingSize::Servings(count) => json!({ "kind": self.kind(), "amount": count }),
            ServingSize::Mass(q) | ServingSize::Volume(q) | ServingSize::Energy(q) => {
                json!({ "kind": self.kind(), "amount": q })
            }
            ServingSize::Custom { name, amount } => {
                json!({ "kind": self.kind(), "amount": amount, "name": name })
            }
        }
    }
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str, legacy: &str) -> Option<&'a Value> {
    fields.get(name).or_else(|| fields.get(legacy))
}

fn quantity_in(value: &Value, dimension: Dimension) -> Option<Quantity> {
    let quantity = Quantity::deserialize(value).ok()?;
    (quantity.dimension() == dimension).then_some(quantity)
}

fn plural_suffix(amount: f64) -> &'static str {
    if amount == 1.0 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for ServingSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServingSize::Servings(count) => {
                write!(f, "{} serving{}", count, plural_suffix(*count))
            }
            ServingSize::Mass(q) | ServingSize::Volume(q) | ServingSize::Energy(q) => {
                write!(f, "{}", q)
            }
            ServingSize::Custom { name, amount } => {
                write!(f, "{} {}{}", amount, name, plural_suffix(*amount))
            }
        }
    }
}

/// Parses the textual forms `Display` produces for servings and measured
/// amounts ("2", "1 serving", "56g", "1 cup (US)"). Any other trailing text
/// is taken verbatim as a custom size name ("2 cookie").
impl FromStr for ServingSize {
    type Err = ServingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let split = text
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+'))
            .map(|(i, _)| i)
            .unwrap_or(text.len());

        let (number, rest) = text.split_at(split);
        let amount: f64 = number
            .parse()
            .map_err(|_| ServingError::InvalidServingSize(s.to_string()))?;
        let rest = rest.trim();

        if rest.is_empty() || rest == "serving" || rest == "servings" {
            return Ok(ServingSize::Servings(amount));
        }

        if let Some(unit) = parse_unit(rest) {
            let quantity = Quantity::new(amount, unit);
            return Ok(match unit.dimension() {
                Dimension::Mass => ServingSize::Mass(quantity),
                Dimension::Volume => ServingSize::Volume(quantity),
                Dimension::Energy => ServingSize::Energy(quantity),
            });
        }

        Ok(ServingSize::custom(rest, amount))
    }
}

impl Serialize for ServingSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ServingSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Value::deserialize(deserializer)?;
        ServingSize::from_record(&record).ok_or_else(|| {
            serde::de::Error::custom(format!("unparseable serving size record: {}", record))
        })
    }
}

/// Deserialize an optional serving size, treating unparseable records as
/// absent so the caller's default applies.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<ServingSize>, D::Error>
where
    D: Deserializer<'de>,
{
    let record = Option::<Value>::deserialize(deserializer)?;
    Ok(record.and_then(|record| {
        let parsed = ServingSize::from_record(&record);
        if parsed.is_none() && !record.is_null() {
            tracing::warn!("Unparseable serving size record {}, using default", record);
        }
        parsed
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::Unit;

    fn all_variants() -> Vec<ServingSize> {
        vec![
            ServingSize::servings(1.5),
            ServingSize::mass(Quantity::grams(56.0)),
            ServingSize::volume(Quantity::new(2.0, Unit::Tablespoon)),
            ServingSize::energy(Quantity::kilocalories(250.0)),
            ServingSize::custom("cookie", 2.0),
        ]
    }

    #[test]
    fn test_amount_for_every_variant() {
        let amounts: Vec<f64> = all_variants().iter().map(ServingSize::amount).collect();
        assert_eq!(amounts, vec![1.5, 56.0, 2.0, 250.0, 2.0]);
    }

    #[test]
    fn test_scaled_preserves_variant() {
        assert_eq!(
            ServingSize::mass(Quantity::grams(28.0)).scaled(2.0),
            ServingSize::mass(Quantity::grams(56.0))
        );
        assert_eq!(
            ServingSize::custom("cookie", 0.5).scaled(4.0),
            ServingSize::custom("cookie", 2.0)
        );
        assert_eq!(ServingSize::default().scaled(3.0), ServingSize::servings(3.0));
    }

    #[test]
    fn test_record_round_trip() {
        for size in all_variants() {
            assert_eq!(ServingSize::from_record(&size.to_record()), Some(size.clone()));
        }
    }

    #[test]
    fn test_record_shapes() {
        assert_eq!(
            ServingSize::servings(2.0).to_record(),
            json!({"kind": "servings", "amount": 2.0})
        );
        assert_eq!(
            ServingSize::mass(Quantity::grams(30.0)).to_record(),
            json!({"kind": "mass", "amount": {"amount": 30.0, "unit": "g"}})
        );
        assert_eq!(
            ServingSize::custom("slice", 1.0).to_record(),
            json!({"kind": "customSize", "amount": 1.0, "name": "slice"})
        );
    }

    #[test]
    fn test_legacy_field_names() {
        let size = ServingSize::from_record(&json!({"type": "servings", "value": 3}));
        assert_eq!(size, Some(ServingSize::servings(3.0)));

        let size = ServingSize::from_record(&json!({
            "type": "volume",
            "value": {"amount": 1, "unit": "tbsp  (US)"}
        }));
        assert_eq!(
            size,
            Some(ServingSize::volume(Quantity::new(1.0, Unit::Tablespoon)))
        );
    }

    #[test]
    fn test_unparseable_records() {
        let bad = [
            json!({"kind": "bogus"}),
            json!({"kind": "bogus", "amount": 1}),
            json!({"kind": "customSize", "amount": 2}),
            json!({"kind": "customSize", "name": "cookie"}),
            json!({"kind": "mass", "amount": 30}),
            json!({"kind": "mass", "amount": {"amount": 1, "unit": "cup"}}),
            json!({"kind": "energy", "amount": {"amount": 1, "unit": "furlong"}}),
            json!({"kind": "servings", "amount": {"amount": 1, "unit": "g"}}),
            json!({"kind": "servings"}),
            json!({"amount": 1}),
            json!("servings"),
            json!(null),
        ];
        for record in bad {
            assert_eq!(ServingSize::from_record(&record), None, "{}", record);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ServingSize::servings(1.0).to_string(), "1 serving");
        assert_eq!(ServingSize::servings(0.0).to_string(), "0 servings");
        assert_eq!(ServingSize::servings(0.5).to_string(), "0.5 servings");
        assert_eq!(ServingSize::servings(2.0).to_string(), "2 servings");
        assert_eq!(ServingSize::mass(Quantity::grams(56.0)).to_string(), "56g");
        assert_eq!(
            ServingSize::volume(Quantity::milliliters(250.0)).to_string(),
            "250mL"
        );
        assert_eq!(ServingSize::custom("cookie", 1.0).to_string(), "1 cookie");
        assert_eq!(ServingSize::custom("cookie", 3.0).to_string(), "3 cookies");
    }

    #[test]
    fn test_parse_text() {
        assert_eq!("2".parse::<ServingSize>(), Ok(ServingSize::servings(2.0)));
        assert_eq!(
            "1.5 servings".parse::<ServingSize>(),
            Ok(ServingSize::servings(1.5))
        );
        assert_eq!(
            "56g".parse::<ServingSize>(),
            Ok(ServingSize::mass(Quantity::grams(56.0)))
        );
        assert_eq!(
            "1 cup (US)".parse::<ServingSize>(),
            Ok(ServingSize::volume(Quantity::new(1.0, Unit::Cup)))
        );
        assert_eq!(
            "100 kcal".parse::<ServingSize>(),
            Ok(ServingSize::energy(Quantity::kilocalories(100.0)))
        );
        assert_eq!(
            "2 cookie".parse::<ServingSize>(),
            Ok(ServingSize::custom("cookie", 2.0))
        );
        assert!(matches!(
            "cookie".parse::<ServingSize>(),
            Err(ServingError::InvalidServingSize(_))
        ));
    }

    #[test]
    fn test_display_parses_back_for_measured_sizes() {
        for size in &all_variants()[..4] {
            assert_eq!(size.to_string().parse::<ServingSize>().as_ref(), Ok(size));
        }
    }

    #[test]
    fn test_serde_uses_record_shape() {
        let size: ServingSize =
            serde_json::from_value(json!({"kind": "customSize", "name": "bar", "amount": 1}))
                .unwrap();
        assert_eq!(size, ServingSize::custom("bar", 1.0));
        assert!(serde_json::from_value::<ServingSize>(json!({"kind": "bogus"})).is_err());
    }
}
