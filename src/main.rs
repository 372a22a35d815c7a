//! Portion
//!
//! Resolves a serving size against a food record and prints the resulting
//! nutrition as JSON.
//!
//! Usage: `portion <food.json> [serving size] [preparation id]`
//!
//! The serving size is either text ("56g", "2 servings", "1 cookie") or a
//! serving size record (`{"kind": "mass", ...}`).

use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use portion::build_info::{self, BuildInfo};
use portion::models::{CompositeGroup, Preparation, Product};
use portion::nutrition::{ReferenceServing, Resolution, ServingSize};
use portion::{ResolverConfig, ServingResult};

/// A food record of any shape
enum Food {
    Preparation(Preparation),
    Product(Product),
    Group(CompositeGroup),
}

impl Food {
    /// Groups carry `items`, products carry `preparations`
    fn from_record(record: Value) -> Result<Self, serde_json::Error> {
        if record.get("items").is_some() {
            Ok(Food::Group(serde_json::from_value(record)?))
        } else if record.get("preparations").is_some() {
            Ok(Food::Product(serde_json::from_value(record)?))
        } else {
            Ok(Food::Preparation(serde_json::from_value(record)?))
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Food::Preparation(prep) => Some(prep.name.as_str()),
            Food::Product(product) => product.name.as_deref(),
            Food::Group(group) => group.name.as_deref(),
        }
    }

    fn resolve(
        &self,
        requested: &ServingSize,
        preparation_id: Option<&str>,
        config: &ResolverConfig,
    ) -> Result<ServingResult<Resolution>, String> {
        match self {
            Food::Preparation(prep) => Ok(prep.resolve_with(requested, config)),
            Food::Product(product) => product
                .preparation(preparation_id)
                .map(|prep| prep.resolve_with(requested, config))
                .ok_or_else(|| "Product has no preparations".to_string()),
            Food::Group(group) => Ok(group
                .one_serving_with(config)
                .resolve_with(requested, config)),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    food: Option<&'a str>,
    label: String,
    resolution: Resolution,
    build: BuildInfo,
}

/// Unparseable input falls back to one serving
fn parse_serving_size(arg: Option<&str>) -> ServingSize {
    let Some(arg) = arg else {
        return ServingSize::default();
    };

    let parsed = if arg.trim_start().starts_with('{') {
        serde_json::from_str::<Value>(arg)
            .ok()
            .and_then(|record| ServingSize::from_record(&record))
    } else {
        arg.parse().ok()
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!("Could not parse serving size {:?}, using 1 serving", arg);
        ServingSize::default()
    })
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("portion=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first().map(PathBuf::from) else {
        eprintln!("Usage: portion <food.json> [serving size] [preparation id]");
        return Ok(ExitCode::FAILURE);
    };

    build_info::print_startup_banner();

    let config = ResolverConfig::from_env();
    tracing::debug!("Resolver config: {:?}", config);

    let record: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let food = Food::from_record(record)?;
    let requested = parse_serving_size(args.get(1).map(String::as_str));

    let resolution = match food.resolve(&requested, args.get(2).map(String::as_str), &config)? {
        Ok(resolution) => resolution,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let output = Output {
        food: food.name(),
        label: requested.to_string(),
        resolution,
        build: BuildInfo::current(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portion::nutrition::Quantity;
    use serde_json::json;

    #[test]
    fn test_parse_serving_size() {
        assert_eq!(parse_serving_size(None), ServingSize::Servings(1.0));
        assert_eq!(
            parse_serving_size(Some("56g")),
            ServingSize::Mass(Quantity::grams(56.0))
        );
        assert_eq!(
            parse_serving_size(Some(r#"{"kind": "customSize", "name": "cookie", "amount": 2}"#)),
            ServingSize::custom("cookie", 2.0)
        );
        assert_eq!(
            parse_serving_size(Some(r#"{"kind": "bogus"}"#)),
            ServingSize::Servings(1.0)
        );
        assert_eq!(parse_serving_size(Some("lots")), ServingSize::Servings(1.0));
    }

    #[test]
    fn test_food_kind_detection() {
        let food = Food::from_record(json!({"items": []})).unwrap();
        assert!(matches!(food, Food::Group(_)));

        let food = Food::from_record(json!({"preparations": []})).unwrap();
        assert!(matches!(food, Food::Product(_)));

        let food = Food::from_record(json!({"name": "Plain"})).unwrap();
        assert_eq!(food.name(), Some("Plain"));
    }

    #[test]
    fn test_resolve_product_without_preparations() {
        let food = Food::Product(Product::default());
        let result = food.resolve(&ServingSize::default(), None, &ResolverConfig::default());
        assert!(result.is_err());
    }
}
