//! Portion Library
//!
//! Nutrition unit conversion and serving size resolution: nutrient profiles
//! per reference serving, requested serving sizes in any measurement system,
//! and aggregation across nested composite foods.

pub mod build_info;
pub mod config;
pub mod error;
pub mod models;
pub mod nutrition;

pub use config::ResolverConfig;
pub use error::{ServingError, ServingResult};
