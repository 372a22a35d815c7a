//! Product model
//!
//! A food with one or more preparations.

use serde::{Deserialize, Serialize};

use super::barcode::{barcode_serving, Barcode};
use super::preparation::Preparation;
use super::record::deserialize_id;
use crate::nutrition::ServingSize;

/// A food product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub preparations: Vec<Preparation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub barcodes: Vec<Barcode>,
}

impl Product {
    pub fn new(name: impl Into<String>, preparations: Vec<Preparation>) -> Self {
        Self {
            name: Some(name.into()),
            preparations,
            ..Self::default()
        }
    }

    /// The preparation with `id`, else the first one
    pub fn preparation(&self, id: Option<&str>) -> Option<&Preparation> {
        id.and_then(|id| {
            self.preparations
                .iter()
                .find(|prep| prep.id.as_deref() == Some(id))
        })
        .or_else(|| self.preparations.first())
    }

    pub fn barcode_serving(&self, code: &str) -> Option<ServingSize> {
        barcode_serving(&self.barcodes, code)
    }
}
