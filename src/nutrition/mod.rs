//! Nutrition calculation module
//!
//! Units, quantities, nutrient profiles, serving sizes and the resolution
//! algorithm shared by every kind of food.

pub mod custom_size;
pub mod profile;
pub mod quantity;
pub mod resolver;
pub mod serving_size;
pub mod units;

pub use custom_size::CustomSizeDefinition;
pub use profile::{Nutrient, NutrientProfile};
pub use quantity::Quantity;
pub use resolver::{ReferenceServing, Resolution};
pub use serving_size::ServingSize;
pub use units::{
    grams_per_unit, joules_per_unit, ml_per_unit, normalize_unit, parse_unit, Dimension, Unit,
};
