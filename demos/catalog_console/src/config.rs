// demos/catalog_console/src/config.rs

use crate::errors::{AppError, Result};
use catalog_flow::{CatalogConfig, CategoryList};
use dotenvy::dotenv;
use std::env;

const DEFAULT_CATEGORIES: &str = "tools:Tools,apparel:Apparel,electronics:Electronics,food:Food";

#[derive(Debug, Clone)]
pub struct DemoConfig {
  pub catalog: CatalogConfig,
  /// Simulated round-trip time of every store call.
  pub latency_ms: u64,
  /// Makes the first image upload fail, to show the retry path.
  pub fail_first_upload: bool,
}

impl DemoConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    let mut catalog = CatalogConfig::from_env()?;
    if catalog.categories.is_empty() {
      catalog.categories = CategoryList::parse(DEFAULT_CATEGORIES)?;
    }

    let latency_ms = env::var("DEMO_LATENCY_MS")
      .unwrap_or_else(|_| "25".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid DEMO_LATENCY_MS: {}", e)))?;
    let fail_first_upload = env::var("DEMO_FAIL_FIRST_UPLOAD")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid DEMO_FAIL_FIRST_UPLOAD value: {}", e)))?;

    tracing::info!(latency_ms, fail_first_upload, "Demo configuration loaded.");
    Ok(Self {
      catalog,
      latency_ms,
      fail_first_upload,
    })
  }
}
