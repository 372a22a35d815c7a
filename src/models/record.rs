//! Record helpers shared by the food models

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::nutrition::{Dimension, Quantity};

/// Record ids arrive as strings or numbers; both become strings
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

/// Reference mass; a quantity in another dimension or unit system is
/// dropped with a warning
pub fn deserialize_mass<'de, D>(deserializer: D) -> Result<Option<Quantity>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_measure(deserializer, Dimension::Mass)
}

/// Reference volume, read like [`deserialize_mass`]
pub fn deserialize_volume<'de, D>(deserializer: D) -> Result<Option<Quantity>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_measure(deserializer, Dimension::Volume)
}

fn deserialize_measure<'de, D>(
    deserializer: D,
    dimension: Dimension,
) -> Result<Option<Quantity>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match Quantity::deserialize(&value) {
        Ok(quantity) if quantity.dimension() == dimension => Ok(Some(quantity)),
        Ok(quantity) => {
            tracing::warn!(
                "Ignoring reference {} {}: {} is not a {} unit",
                dimension.reference_label(),
                quantity,
                quantity.unit,
                dimension
            );
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("Ignoring reference {}: {}", dimension.reference_label(), e);
            Ok(None)
        }
    }
}
