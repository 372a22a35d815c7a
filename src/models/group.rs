//! Composite group model
//!
//! A food made of other foods: products and nested groups, each contributing
//! some amount toward one serving of the group.

use serde::{Deserialize, Serialize};

use super::barcode::{barcode_serving, Barcode};
use super::product::Product;
use super::record::{deserialize_id, deserialize_mass, deserialize_volume};
use crate::config::ResolverConfig;
use crate::error::{ServingError, ServingResult};
use crate::nutrition::serving_size::deserialize_lenient;
use crate::nutrition::{
    CustomSizeDefinition, NutrientProfile, Quantity, ReferenceServing, Resolution, ServingSize,
};

/// What a group item refers to
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSource {
    /// A product, with an optional preparation selector
    Product {
        product: Product,
        preparation_id: Option<String>,
    },
    Group(Box<CompositeGroup>),
}

/// One entry of a composite group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroupItemRecord", into = "GroupItemRecord")]
pub struct GroupItem {
    /// Amount counted toward one serving of the parent, one serving when absent
    pub serving_size: Option<ServingSize>,
    pub source: Option<ItemSource>,
}

/// Nutrition, mass and volume an item contributes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedServing {
    pub nutrition: NutrientProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Quantity>,
}

impl From<Resolution> for ResolvedServing {
    fn from(resolution: Resolution) -> Self {
        Self {
            nutrition: resolution.nutrition,
            mass: resolution.mass,
            volume: resolution.volume,
        }
    }
}

/// A food composed of products and other groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeGroup {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<GroupItem>,
    /// Explicit mass of one serving, overriding the item sum
    #[serde(
        default,
        deserialize_with = "deserialize_mass",
        skip_serializing_if = "Option::is_none"
    )]
    pub mass: Option<Quantity>,
    /// Explicit volume of one serving, overriding the item sum
    #[serde(
        default,
        deserialize_with = "deserialize_volume",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_sizes: Vec<CustomSizeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub barcodes: Vec<Barcode>,
}

/// One serving of a group, aggregated from its items
#[derive(Debug, Clone, PartialEq)]
pub struct GroupServing {
    pub nutrition: NutrientProfile,
    pub mass: Option<Quantity>,
    pub volume: Option<Quantity>,
    custom_sizes: Vec<CustomSizeDefinition>,
}

impl ReferenceServing for GroupServing {
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

/// Groups currently being aggregated, outermost first
struct Walk<'a> {
    config: &'a ResolverConfig,
    ancestors: Vec<Option<&'a str>>,
}

impl<'a> Walk<'a> {
    fn new(config: &'a ResolverConfig) -> Self {
        Self {
            config,
            ancestors: Vec::new(),
        }
    }

    fn is_ancestor(&self, id: Option<&str>) -> bool {
        id.is_some() && self.ancestors.iter().any(|ancestor| *ancestor == id)
    }
}

impl GroupItem {
    pub fn product(product: Product, preparation_id: Option<String>) -> Self {
        Self {
            serving_size: None,
            source: Some(ItemSource::Product {
                product,
                preparation_id,
            }),
        }
    }

    pub fn group(group: CompositeGroup) -> Self {
        Self {
            serving_size: None,
            source: Some(ItemSource::Group(Box::new(group))),
        }
    }

    pub fn with_serving_size(mut self, serving_size: ServingSize) -> Self {
        self.serving_size = Some(serving_size);
        self
    }

    pub fn effective_serving_size(&self) -> ServingSize {
        self.serving_size.clone().unwrap_or_default()
    }

    /// What this item contributes to one serving of its group.
    ///
    /// A failure to resolve the item's own serving size falls back to one
    /// unscaled reference serving. `None` means the item refers to nothing
    /// usable and contributes nothing.
    pub fn resolved_serving(&self) -> Option<ResolvedServing> {
        self.resolved_serving_with(&ResolverConfig::default())
    }

    pub fn resolved_serving_with(&self, config: &ResolverConfig) -> Option<ResolvedServing> {
        self.resolve_in(&mut Walk::new(config))
    }

    fn resolve_in<'a>(&'a self, walk: &mut Walk<'a>) -> Option<ResolvedServing> {
        let requested = self.effective_serving_size();

        match self.source.as_ref()? {
            ItemSource::Product {
                product,
                preparation_id,
            } => {
                let preparation = product.preparation(preparation_id.as_deref())?;
                Some(contribution(preparation, &requested, walk.config))
            }
            ItemSource::Group(group) => {
                if walk.is_ancestor(group.id.as_deref()) {
                    tracing::warn!(
                        "Group {:?} contains itself, skipping the nested copy",
                        group.id
                    );
                    return None;
                }
                if walk.ancestors.len() >= walk.config.max_depth {
                    tracing::warn!(
                        "Group {:?} is nested more than {} levels deep, skipping",
                        group.id,
                        walk.config.max_depth
                    );
                    return None;
                }

                let reference = group.serving_in(walk);
                Some(contribution(&reference, &requested, walk.config))
            }
        }
    }
}

/// Resolve `requested` against `reference`, falling back to one unscaled
/// reference serving when it cannot be resolved
fn contribution<R: ReferenceServing>(
    reference: &R,
    requested: &ServingSize,
    config: &ResolverConfig,
) -> ResolvedServing {
    match reference.resolve_with(requested, config) {
        Ok(resolution) => resolution.into(),
        Err(e) => {
            tracing::warn!(
                "Cannot resolve {} for group item ({}), counting one serving",
                requested,
                e
            );
            ResolvedServing {
                nutrition: reference.reference_nutrition().clone(),
                mass: reference.reference_mass(),
                volume: reference.reference_volume(),
            }
        }
    }
}

/// Sum of all quantities, or `None` if any is missing or there are none
fn sum_all(quantities: impl Iterator<Item = Option<Quantity>>) -> Option<Quantity> {
    let mut total: Option<Quantity> = None;
    for quantity in quantities {
        let quantity = quantity?;
        total = Some(match total {
            None => quantity,
            Some(sum) => sum.checked_add(&quantity)?,
        });
    }
    total
}

impl CompositeGroup {
    pub fn new(name: impl Into<String>, items: Vec<GroupItem>) -> Self {
        Self {
            name: Some(name.into()),
            items,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// One serving of this group, recomputed from the current items
    pub fn one_serving(&self) -> GroupServing {
        self.one_serving_with(&ResolverConfig::default())
    }

    pub fn one_serving_with(&self, config: &ResolverConfig) -> GroupServing {
        self.serving_in(&mut Walk::new(config))
    }

    fn serving_in<'a>(&'a self, walk: &mut Walk<'a>) -> GroupServing {
        let aggregate = self.aggregate(walk);
        GroupServing {
            nutrition: aggregate.nutrition,
            mass: aggregate.mass,
            volume: aggregate.volume,
            custom_sizes: self.custom_sizes.clone(),
        }
    }

    fn aggregate<'a>(&'a self, walk: &mut Walk<'a>) -> ResolvedServing {
        walk.ancestors.push(self.id.as_deref());
        let contributions: Vec<ResolvedServing> = self
            .items
            .iter()
            .filter_map(|item| item.resolve_in(walk))
            .collect();
        walk.ancestors.pop();

        let nutrition = contributions
            .iter()
            .fold(NutrientProfile::zero(), |total, c| total.add(&c.nutrition));
        let mass = self
            .mass
            .or_else(|| sum_all(contributions.iter().map(|c| c.mass)));
        let volume = self
            .volume
            .or_else(|| sum_all(contributions.iter().map(|c| c.volume)));

        ResolvedServing {
            nutrition,
            mass,
            volume,
        }
    }

    pub fn scalar(&self, requested: &ServingSize) -> ServingResult<f64> {
        self.one_serving().scalar(requested)
    }

    pub fn resolved_profile(&self, requested: &ServingSize) -> ServingResult<NutrientProfile> {
        self.one_serving().resolved_profile(requested)
    }

    pub fn resolve(&self, requested: &ServingSize) -> ServingResult<Resolution> {
        self.one_serving().resolve(requested)
    }

    /// Whether any nested group, at any depth, has `id`
    pub fn contains_group(&self, id: &str) -> bool {
        self.items.iter().any(|item| match &item.source {
            Some(ItemSource::Group(group)) => {
                group.id.as_deref() == Some(id) || group.contains_group(id)
            }
            _ => false,
        })
    }

    /// Whether nesting `candidate` inside this group would make the group
    /// contain itself
    pub fn would_create_cycle(&self, candidate: &CompositeGroup) -> bool {
        match self.id.as_deref() {
            Some(id) => candidate.id.as_deref() == Some(id) || candidate.contains_group(id),
            None => false,
        }
    }

    /// Append an item, refusing nested groups that would contain this group
    pub fn try_add_item(&mut self, item: GroupItem) -> ServingResult<()> {
        if let Some(ItemSource::Group(group)) = &item.source {
            if self.would_create_cycle(group) {
                return Err(ServingError::CyclicGroup(self.id.clone().unwrap_or_default()));
            }
        }
        self.items.push(item);
        Ok(())
    }

    pub fn barcode_serving(&self, code: &str) -> Option<ServingSize> {
        barcode_serving(&self.barcodes, code)
    }
}

/// Record form of a group item
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupItemRecord {
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    serving_size: Option<ServingSize>,
    #[serde(
        rename = "preparationID",
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    preparation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<CompositeGroup>,
}

impl From<GroupItemRecord> for GroupItem {
    fn from(record: GroupItemRecord) -> Self {
        let source = match (record.product, record.group) {
            (Some(product), _) => Some(ItemSource::Product {
                product,
                preparation_id: record.preparation_id,
            }),
            (None, Some(group)) => Some(ItemSource::Group(Box::new(group))),
            (None, None) => None,
        };
        Self {
            serving_size: record.serving_size,
            source,
        }
    }
}

impl From<GroupItem> for GroupItemRecord {
    fn from(item: GroupItem) -> Self {
        let mut record = GroupItemRecord {
            serving_size: item.serving_size,
            preparation_id: None,
            product: None,
            group: None,
        };
        match item.source {
            Some(ItemSource::Product {
                product,
                preparation_id,
            }) => {
                record.product = Some(product);
                record.preparation_id = preparation_id;
            }
            Some(ItemSource::Group(group)) => record.group = Some(*group),
            None => {}
        }
        record
    }
}
