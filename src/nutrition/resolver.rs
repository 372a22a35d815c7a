//! Serving size resolution
//!
//! Turns a requested [`ServingSize`] into a multiple of a food's reference
//! serving. Preparations and composite groups share this algorithm and only
//! differ in where their reference values come from.

use serde::Serialize;

use super::custom_size::CustomSizeDefinition;
use super::profile::NutrientProfile;
use super::quantity::Quantity;
use super::serving_size::ServingSize;
use super::units::Dimension;
use crate::config::ResolverConfig;
use crate::error::{ServingError, ServingResult};

/// Reference values a requested serving size is resolved against
pub trait ReferenceServing {
    /// Nutrition of one reference serving
    fn reference_nutrition(&self) -> &NutrientProfile;

    fn reference_mass(&self) -> Option<Quantity>;

    fn reference_volume(&self) -> Option<Quantity>;

    fn reference_calories(&self) -> Option<Quantity> {
        self.reference_nutrition().calories()
    }

    fn custom_sizes(&self) -> &[CustomSizeDefinition];

    /// Multiple of the reference serving that `requested` represents
    fn scalar(&self, requested: &ServingSize) -> ServingResult<f64> {
        self.scalar_with(requested, &ResolverConfig::default())
    }

    fn scalar_with(&self, requested: &ServingSize, config: &ResolverConfig) -> ServingResult<f64> {
        let mut chain = Vec::new();
        scalar_in_chain(self, requested, config, &mut chain)
    }

    /// Nutrition for `requested`
    fn resolved_profile(&self, requested: &ServingSize) -> ServingResult<NutrientProfile> {
        self.resolved_profile_with(requested, &ResolverConfig::default())
    }

    fn resolved_profile_with(
        &self,
        requested: &ServingSize,
        config: &ResolverConfig,
    ) -> ServingResult<NutrientProfile> {
        let scalar = self.scalar_with(requested, config)?;
        Ok(self.reference_nutrition().scaled(scalar))
    }

    /// Scalar, nutrition and the mass/volume of the requested amount
    fn resolve(&self, requested: &ServingSize) -> ServingResult<Resolution> {
        self.resolve_with(requested, &ResolverConfig::default())
    }

    fn resolve_with(
        &self,
        requested: &ServingSize,
        config: &ResolverConfig,
    ) -> ServingResult<Resolution> {
        let scalar = self.scalar_with(requested, config)?;
        Ok(Resolution {
            serving_size: requested.clone(),
            scalar,
            nutrition: self.reference_nutrition().scaled(scalar),
            mass: self.reference_mass().map(|m| m.scaled(scalar)),
            volume: self.reference_volume().map(|v| v.scaled(scalar)),
        })
    }

    fn find_custom_size(&self, name: &str) -> Option<&CustomSizeDefinition> {
        self.custom_sizes().iter().find(|def| def.name == name)
    }
}

/// Outcome of resolving a serving size
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub serving_size: ServingSize,
    pub scalar: f64,
    pub nutrition: NutrientProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Quantity>,
}

/// `chain` holds the custom size names being expanded, outermost first
fn scalar_in_chain<R: ReferenceServing + ?Sized>(
    reference: &R,
    requested: &ServingSize,
    config: &ResolverConfig,
    chain: &mut Vec<String>,
) -> ServingResult<f64> {
    match requested {
        ServingSize::Servings(count) => Ok(*count),
        ServingSize::Mass(q) => ratio(q, reference.reference_mass(), Dimension::Mass),
        ServingSize::Volume(q) => ratio(q, reference.reference_volume(), Dimension::Volume),
        ServingSize::Energy(q) => ratio(q, reference.reference_calories(), Dimension::Energy),
        ServingSize::Custom { name, amount } => {
            if chain.iter().any(|seen| seen == name) {
                return Err(ServingError::CyclicCustomSize(name.clone()));
            }
            if chain.len() >= config.max_depth {
                return Err(ServingError::DepthExceeded(config.max_depth));
            }

            let definition = reference
                .find_custom_size(name)
                .ok_or_else(|| ServingError::UnknownCustomSize(name.clone()))?;

            tracing::debug!(
                "Expanding {} as {} x {}",
                name,
                amount,
                definition.serving_size
            );

            chain.push(name.clone());
            let result = scalar_in_chain(
                reference,
                &definition.serving_size.scaled(*amount),
                config,
                chain,
            );
            chain.pop();
            result
        }
    }
}

/// `requested / reference` after converting into the reference unit
fn ratio(
    requested: &Quantity,
    reference: Option<Quantity>,
    dimension: Dimension,
) -> ServingResult<f64> {
    if requested.dimension() != dimension {
        return Err(ServingError::MismatchedUnit {
            expected: dimension,
            unit: requested.unit,
        });
    }

    let reference = reference.ok_or_else(|| ServingError::no_reference(dimension))?;

    let converted = requested.checked_converted(reference.unit).ok_or_else(|| {
        ServingError::UnsupportedDimension {
            dimension,
            reason: format!("reference is declared in {}", reference.unit),
        }
    })?;

    if reference.amount == 0.0 {
        return Err(ServingError::UnsupportedDimension {
            dimension,
            reason: format!("reference {} is zero", dimension.reference_label()),
        });
    }

    Ok(converted.amount / reference.amount)
}
