//! Barcode model
//!
//! A scannable code and the amount of food it stands for.

use serde::{Deserialize, Serialize};

use crate::nutrition::serving_size::{deserialize_lenient, ServingSize};

/// A barcode printed on a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Amount one scan represents, one serving when absent
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub serving_size: Option<ServingSize>,
}

impl Barcode {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            notes: Vec::new(),
            serving_size: None,
        }
    }

    pub fn with_serving_size(mut self, serving_size: ServingSize) -> Self {
        self.serving_size = Some(serving_size);
        self
    }

    /// Serving size one scan stands for
    pub fn effective_serving_size(&self) -> ServingSize {
        self.serving_size.clone().unwrap_or_default()
    }
}

/// Serving size for `code` among `barcodes`
pub fn barcode_serving(barcodes: &[Barcode], code: &str) -> Option<ServingSize> {
    barcodes
        .iter()
        .find(|barcode| barcode.code == code)
        .map(Barcode::effective_serving_size)
}
