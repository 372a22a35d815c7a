//! Error types
//!
//! Resolution failures are routine: callers show the message and render a
//! fallback state.

use thiserror::Error;

use crate::nutrition::{Dimension, Unit};

/// Serving size resolution and parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServingError {
    #[error("Cannot calculate serving by {dimension}: {reason}")]
    UnsupportedDimension { dimension: Dimension, reason: String },

    #[error("Unknown custom size: {0}")]
    UnknownCustomSize(String),

    #[error("Unknown serving size type: {unit} is not a {expected} unit")]
    MismatchedUnit { expected: Dimension, unit: Unit },

    #[error("Custom size '{0}' is defined in terms of itself")]
    CyclicCustomSize(String),

    #[error("Group '{0}' cannot contain itself")]
    CyclicGroup(String),

    #[error("Serving size nesting exceeds {0} levels")]
    DepthExceeded(usize),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Invalid serving size: {0}")]
    InvalidServingSize(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServingError {
    /// Missing reference value for a dimension
    pub(crate) fn no_reference(dimension: Dimension) -> Self {
        ServingError::UnsupportedDimension {
            dimension,
            reason: format!("no reference {} is defined", dimension.reference_label()),
        }
    }
}

/// Result type for serving size operations
pub type ServingResult<T> = Result<T, ServingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ServingError::no_reference(Dimension::Volume);
        assert_eq!(
            err.to_string(),
            "Cannot calculate serving by volume: no reference volume is defined"
        );

        let err = ServingError::UnknownCustomSize("cookie".to_string());
        assert_eq!(err.to_string(), "Unknown custom size: cookie");

        let err = ServingError::MismatchedUnit {
            expected: Dimension::Mass,
            unit: Unit::Cup,
        };
        assert_eq!(
            err.to_string(),
            "Unknown serving size type: cup (US) is not a mass unit"
        );
    }
}
