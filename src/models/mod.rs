//! Food models
//!
//! Preparations, products and composite groups as exchanged in records.

mod barcode;
mod group;
mod preparation;
mod product;
mod record;

pub use barcode::{barcode_serving, Barcode};
pub use group::{CompositeGroup, GroupItem, GroupServing, ItemSource, ResolvedServing};
pub use preparation::Preparation;
pub use product::Product;
pub use record::{deserialize_id, deserialize_mass, deserialize_volume};
