//! Preparation model
//!
//! One way a product is prepared, with the nutrition of one reference serving.

use serde::{Deserialize, Serialize};

use super::record::{deserialize_id, deserialize_mass, deserialize_volume};
use crate::nutrition::{CustomSizeDefinition, NutrientProfile, Quantity, ReferenceServing};

fn default_name() -> String {
    "Default".to_string()
}

/// A reference serving of a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preparation {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(rename = "nutritionalInformation", default)]
    pub nutrition: NutrientProfile,
    #[serde(
        default,
        deserialize_with = "deserialize_mass",
        skip_serializing_if = "Option::is_none"
    )]
    pub mass: Option<Quantity>,
    #[serde(
        default,
        deserialize_with = "deserialize_volume",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_sizes: Vec<CustomSizeDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Default for Preparation {
    fn default() -> Self {
        Self {
            id: None,
            name: default_name(),
            nutrition: NutrientProfile::empty(),
            mass: None,
            volume: None,
            custom_sizes: Vec::new(),
            serving_size_description: None,
            notes: Vec::new(),
        }
    }
}

impl Preparation {
    pub fn new(nutrition: NutrientProfile) -> Self {
        Self {
            nutrition,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_mass(mut self, mass: Quantity) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_volume(mut self, volume: Quantity) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_custom_size(mut self, custom_size: CustomSizeDefinition) -> Self {
        self.custom_sizes.push(custom_size);
        self
    }
}

impl ReferenceServing for Preparation {
    fn reference_nutrition(&self) -> &NutrientProfile {
        &self.nutrition
    }

    fn reference_mass(&self) -> Option<Quantity> {
        self.mass
    }

    fn reference_volume(&self) -> Option<Quantity> {
        self.volume
    }

    fn custom_sizes(&self) -> &[CustomSizeDefinition] {
        &self.custom_sizes
    }
}
