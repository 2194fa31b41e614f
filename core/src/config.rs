// catalog_flow/src/config.rs

use crate::error::{CatalogError, CatalogResult};
use crate::gateway::ProductPaths;
use crate::product::{CategoryList, ProductValidator, ValidationPolicy};
use dotenvy::dotenv;
use std::env;

/// Settings for the catalog dialogs and their workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
  /// Store location holding product records.
  pub products_location: String,
  pub categories: CategoryList,
  pub policy: ValidationPolicy,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      products_location: "products".to_string(),
      categories: CategoryList::default(),
      policy: ValidationPolicy::default(),
    }
  }
}

impl CatalogConfig {
  /// Loads `.env` if present, then reads the `CATALOG_*` variables.
  pub fn from_env() -> CatalogResult<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable lookup. Unset variables take defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CatalogResult<Self> {
    let defaults = Self::default();

    let products_location = lookup("CATALOG_PRODUCTS_LOCATION")
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
      .unwrap_or(defaults.products_location);

    let categories = match lookup("CATALOG_CATEGORIES") {
      Some(raw) => CategoryList::parse(&raw)?,
      None => defaults.categories,
    };

    let parse_bound = |name: &str, default: f64| -> CatalogResult<f64> {
      match lookup(name) {
        Some(raw) => raw
          .trim()
          .parse::<f64>()
          .ok()
          .filter(|v| v.is_finite())
          .ok_or_else(|| CatalogError::Config(format!("Invalid {}: '{}'", name, raw))),
        None => Ok(default),
      }
    };
    let numeric_min = parse_bound("CATALOG_NUMERIC_MIN", defaults.policy.numeric_min)?;
    let numeric_max = parse_bound("CATALOG_NUMERIC_MAX", defaults.policy.numeric_max)?;
    if numeric_min > numeric_max {
      return Err(CatalogError::Config(format!(
        "CATALOG_NUMERIC_MIN ({}) is above CATALOG_NUMERIC_MAX ({})",
        numeric_min, numeric_max
      )));
    }

    let enforce_category_membership = lookup("CATALOG_ENFORCE_CATEGORY")
      .map(|raw| {
        raw
          .trim()
          .parse::<bool>()
          .map_err(|e| CatalogError::Config(format!("Invalid CATALOG_ENFORCE_CATEGORY value: {}", e)))
      })
      .transpose()?
      .unwrap_or(defaults.policy.enforce_category_membership);

    if enforce_category_membership && categories.is_empty() {
      return Err(CatalogError::Config(
        "CATALOG_ENFORCE_CATEGORY is set but CATALOG_CATEGORIES is empty".to_string(),
      ));
    }

    tracing::info!(%products_location, categories = categories.len(), "Catalog configuration loaded.");
    Ok(Self {
      products_location,
      categories,
      policy: ValidationPolicy {
        numeric_min,
        numeric_max,
        enforce_category_membership,
      },
    })
  }

  pub fn validator(&self) -> ProductValidator {
    ProductValidator::new(self.policy.clone(), self.categories.clone())
  }

  pub fn paths(&self) -> ProductPaths {
    ProductPaths::new(self.products_location.clone())
  }
}
