// demos/catalog_console/src/services/latency_store.rs

//! Wraps the in-memory store with a fixed delay per call, standing in for the network.

use async_trait::async_trait;
use catalog_flow::{
  GatewayResult, ImageFile, ImageStore, InMemoryCatalogStore, NewProduct, ProductId, ProductUpdate, RecordStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct LatencyStore {
  inner: Arc<InMemoryCatalogStore>,
  latency: Duration,
}

impl LatencyStore {
  pub fn new(inner: Arc<InMemoryCatalogStore>, latency_ms: u64) -> Self {
    Self {
      inner,
      latency: Duration::from_millis(latency_ms),
    }
  }

  async fn round_trip(&self, op: &str) {
    debug!(op, latency_ms = self.latency.as_millis() as u64, "Simulating network latency.");
    tokio::time::sleep(self.latency).await;
  }
}

#[async_trait]
impl RecordStore for LatencyStore {
  async fn create(&self, location: &str, record: &NewProduct) -> GatewayResult<ProductId> {
    self.round_trip("create").await;
    self.inner.create(location, record).await
  }

  async fn update(&self, path: &str, record: &ProductUpdate) -> GatewayResult<()> {
    self.round_trip("update").await;
    self.inner.update(path, record).await
  }
}

#[async_trait]
impl ImageStore for LatencyStore {
  async fn upload_image(&self, file: &ImageFile, name: &str) -> GatewayResult<String> {
    self.round_trip("upload_image").await;
    self.inner.upload_image(file, name).await
  }
}
