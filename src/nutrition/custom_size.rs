//! Custom size definitions
//!
//! A food-specific shorthand such as "cookie" or "slice" standing for an
//! underlying serving size.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::serving_size::ServingSize;

/// A named custom size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CustomSizeRecord")]
pub struct CustomSizeDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singular_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub serving_size: ServingSize,
}

impl CustomSizeDefinition {
    pub fn new(name: impl Into<String>, serving_size: ServingSize) -> Self {
        Self {
            name: name.into(),
            singular_name: None,
            plural_name: None,
            notes: Vec::new(),
            serving_size,
        }
    }

    /// Shorthand for a custom size worth `servings` reference servings
    pub fn with_servings(name: impl Into<String>, servings: f64) -> Self {
        Self::new(name, ServingSize::Servings(servings))
    }

    pub fn with_display_names(
        mut self,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        self.singular_name = Some(singular.into());
        self.plural_name = Some(plural.into());
        self
    }

    /// "1 cookie", "3 cookies", preferring the declared display names
    pub fn label(&self, amount: f64) -> String {
        let noun = if amount == 1.0 {
            self.singular_name.clone().unwrap_or_else(|| self.name.clone())
        } else {
            self.plural_name
                .clone()
                .unwrap_or_else(|| format!("{}s", self.name))
        };
        format!("{} {}", amount, noun)
    }
}

/// Record form. `servingSize` may be a serving size record or a bare number
/// of servings; anything else falls back to one serving.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomSizeRecord {
    name: String,
    #[serde(default)]
    singular_name: Option<String>,
    #[serde(default)]
    plural_name: Option<String>,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    serving_size: Option<Value>,
}

impl From<CustomSizeRecord> for CustomSizeDefinition {
    fn from(record: CustomSizeRecord) -> Self {
        let serving_size = match &record.serving_size {
            None | Some(Value::Null) => ServingSize::default(),
            Some(Value::Number(n)) => ServingSize::Servings(n.as_f64().unwrap_or(1.0)),
            Some(other) => ServingSize::from_record(other).unwrap_or_else(|| {
                tracing::warn!(
                    "Custom size '{}' has an unparseable serving size, using 1 serving",
                    record.name
                );
                ServingSize::default()
            }),
        };

        Self {
            name: record.name,
            singular_name: record.singular_name,
            plural_name: record.plural_name,
            notes: record.notes,
            serving_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::Quantity;
    use serde_json::json;

    #[test]
    fn test_record_defaults_to_one_serving() {
        let def: CustomSizeDefinition = serde_json::from_value(json!({"name": "bar"})).unwrap();
        assert_eq!(def.serving_size, ServingSize::Servings(1.0));
        assert!(def.notes.is_empty());
    }

    #[test]
    fn test_record_number_shorthand() {
        let def: CustomSizeDefinition =
            serde_json::from_value(json!({"name": "cookie", "servingSize": 0.5})).unwrap();
        assert_eq!(def, CustomSizeDefinition::with_servings("cookie", 0.5));
    }

    #[test]
    fn test_record_with_serving_size() {
        let def: CustomSizeDefinition = serde_json::from_value(json!({
            "name": "slice",
            "pluralName": "slices of bread",
            "notes": ["thin cut"],
            "servingSize": {"kind": "mass", "amount": {"amount": 28, "unit": "g"}}
        }))
        .unwrap();
        assert_eq!(def.serving_size, ServingSize::Mass(Quantity::grams(28.0)));
        assert_eq!(def.plural_name.as_deref(), Some("slices of bread"));
        assert_eq!(def.notes, vec!["thin cut".to_string()]);
    }

    #[test]
    fn test_record_with_bad_serving_size() {
        let def: CustomSizeDefinition = serde_json::from_value(json!({
            "name": "scoop",
            "servingSize": {"kind": "mass", "amount": 3}
        }))
        .unwrap();
        assert_eq!(def.serving_size, ServingSize::default());
    }

    #[test]
    fn test_round_trip() {
        let def = CustomSizeDefinition::new("cup", ServingSize::custom("cookie", 4.0))
            .with_display_names("cup of cookies", "cups of cookies");
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["servingSize"]["kind"], "customSize");
        let back: CustomSizeDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_label() {
        let plain = CustomSizeDefinition::with_servings("cookie", 0.5);
        assert_eq!(plain.label(1.0), "1 cookie");
        assert_eq!(plain.label(2.0), "2 cookies");

        let named = plain.with_display_names("small cookie", "small cookies");
        assert_eq!(named.label(1.0), "1 small cookie");
        assert_eq!(named.label(0.5), "0.5 small cookies");
    }
}
