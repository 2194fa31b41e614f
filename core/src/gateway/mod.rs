// catalog_flow/src/gateway/mod.rs

//! The remote store boundary: record persistence and image storage.
//!
//! Both are async and report failure through `GatewayError`, never through a sentinel
//! value, so a failed call can not be mistaken for data.

pub mod memory;

use crate::product::{NewProduct, ProductId, ProductUpdate};
use crate::staging::ImageFile;
use async_trait::async_trait;
use thiserror::Error;

pub use memory::{InMemoryCatalogStore, StoreOperation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("store rejected the request: {0}")]
  Rejected(String),

  #[error("no record at '{path}'")]
  NotFound { path: String },

  #[error("record could not be encoded or decoded: {0}")]
  Serialization(String),
}

impl From<serde_json::Error> for GatewayError {
  fn from(err: serde_json::Error) -> Self {
    GatewayError::Serialization(err.to_string())
  }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Keyed document store holding product records.
#[async_trait]
pub trait RecordStore: Send + Sync {
  /// Adds a record under `location` and returns the id the store assigned to it.
  async fn create(&self, location: &str, record: &NewProduct) -> GatewayResult<ProductId>;

  /// Overwrites every field of the record at `path` (`{location}/{id}`).
  async fn update(&self, path: &str, record: &ProductUpdate) -> GatewayResult<()>;
}

/// Blob storage for product images.
#[async_trait]
pub trait ImageStore: Send + Sync {
  /// Uploads `file` under `name` and returns its download URL.
  async fn upload_image(&self, file: &ImageFile, name: &str) -> GatewayResult<String>;
}

/// Where product records live in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPaths {
  location: String,
}

impl ProductPaths {
  pub fn new(location: impl Into<String>) -> Self {
    let location: String = location.into();
    Self {
      location: location.trim_matches('/').to_string(),
    }
  }

  /// Collection path used by creates.
  pub fn collection(&self) -> &str {
    &self.location
  }

  /// Record path used by updates.
  pub fn record(&self, id: &ProductId) -> String {
    format!("{}/{}", self.location, id)
  }
}

impl Default for ProductPaths {
  fn default() -> Self {
    Self::new("products")
  }
}
