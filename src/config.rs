//! Resolver configuration
//!
//! Limits applied while following custom size chains and nested groups.

use serde::{Deserialize, Serialize};

use crate::error::{ServingError, ServingResult};

/// Default nesting limit for custom size chains and nested groups
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Environment variable overriding [`DEFAULT_MAX_DEPTH`]
pub const MAX_DEPTH_ENV: &str = "PORTION_MAX_DEPTH";

/// Resolution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Deepest custom size chain or group nesting followed before giving up
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Load from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(MAX_DEPTH_ENV).ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let config = raw
            .trim()
            .parse()
            .map(|max_depth| Self { max_depth })
            .map_err(|_| ServingError::InvalidConfig(format!("{} is not a number", raw)))
            .and_then(|config| config.validate().map(|_| config));

        config.unwrap_or_else(|e| {
            tracing::warn!(
                "Ignoring {}={:?} ({}), using {}",
                MAX_DEPTH_ENV,
                raw,
                e,
                DEFAULT_MAX_DEPTH
            );
            Self::default()
        })
    }

    pub fn validate(&self) -> ServingResult<()> {
        if self.max_depth == 0 {
            return Err(ServingError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(ResolverConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert!(ResolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_value() {
        assert_eq!(ResolverConfig::from_value(None), ResolverConfig::default());
        assert_eq!(ResolverConfig::from_value(Some(" 4 ")).max_depth, 4);
        assert_eq!(
            ResolverConfig::from_value(Some("deep")),
            ResolverConfig::default()
        );
        assert_eq!(
            ResolverConfig::from_value(Some("0")),
            ResolverConfig::default()
        );
    }

    #[test]
    fn test_zero_depth_is_invalid() {
        let config = ResolverConfig { max_depth: 0 };
        assert!(matches!(
            config.validate(),
            Err(ServingError::InvalidConfig(_))
        ));
    }
}
