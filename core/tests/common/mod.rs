// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper.

use async_trait::async_trait;
use catalog_flow::{
  Clock, GatewayError, GatewayResult, ImageFile, ImageStore, NewProduct, PersistedProduct, ProductField, ProductId,
  ProductInput, ProductPaths, ProductRecord, ProductUpdate, ProductValidator, RecordStore, SubmissionWorkflow,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::Level;

pub const NOW: i64 = 1_700_000_000_000;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---
pub fn widget_input() -> ProductInput {
  ProductInput::default()
    .with(ProductField::ProductName, "Widget")
    .with(ProductField::Category, "tools")
    .with(ProductField::Price, "10")
    .with(ProductField::Cost, "5")
    .with(ProductField::StockAmount, "100")
    .with(ProductField::Options, "red,blue")
}

pub fn widget_record() -> ProductRecord {
  ProductValidator::default().validate(&widget_input()).unwrap()
}

pub fn existing_product() -> PersistedProduct {
  PersistedProduct {
    id: ProductId::new("p1"),
    fields: widget_record(),
    date_created: 1_600_000_000_000,
    last_modified: 1_650_000_000_000,
    image: "http://old.png".to_string(),
  }
}

pub fn png(name: &str) -> ImageFile {
  ImageFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

/// Clock that always reads `NOW`.
pub fn fixed_clock() -> Arc<dyn Clock> {
  Arc::new(|| NOW)
}

// --- Scripted gateway ---

/// Record + image store that logs every call and answers from a script.
#[derive(Default)]
pub struct ScriptedGateway {
  pub created: Mutex<Vec<(String, NewProduct)>>,
  pub updated: Mutex<Vec<(String, ProductUpdate)>>,
  pub uploads: Mutex<Vec<String>>,
  upload_failure: Mutex<Option<GatewayError>>,
  upload_url_override: Mutex<Option<String>>,
  persist_failure: Mutex<Option<GatewayError>>,
  persist_gate: Mutex<Option<Arc<Notify>>>,
  persist_entered: Notify,
}

impl ScriptedGateway {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn fail_uploads(&self, err: GatewayError) {
    *self.upload_failure.lock() = Some(err);
  }

  /// Makes uploads "succeed" with this URL (an empty one mimics a falsy result).
  pub fn upload_returns(&self, url: &str) {
    *self.upload_url_override.lock() = Some(url.to_string());
  }

  pub fn fail_persists(&self, err: GatewayError) {
    *self.persist_failure.lock() = Some(err);
  }

  pub fn succeed_persists(&self) {
    *self.persist_failure.lock() = None;
  }

  /// Holds create/update calls until the returned gate is notified.
  pub fn hold_persists(&self) -> Arc<Notify> {
    let gate = Arc::new(Notify::new());
    *self.persist_gate.lock() = Some(gate.clone());
    gate
  }

  /// Resolves once a create/update call has started.
  pub async fn persist_started(&self) {
    self.persist_entered.notified().await;
  }

  pub fn persist_calls(&self) -> usize {
    self.created.lock().len() + self.updated.lock().len()
  }

  async fn enter_persist(&self) -> GatewayResult<()> {
    self.persist_entered.notify_one();
    let gate = self.persist_gate.lock().clone();
    if let Some(gate) = gate {
      gate.notified().await;
    }
    match self.persist_failure.lock().clone() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }

  pub fn workflow(self: &Arc<Self>) -> Arc<SubmissionWorkflow> {
    Arc::new(SubmissionWorkflow::with_clock(
      self.clone(),
      self.clone(),
      ProductPaths::default(),
      ProductValidator::default(),
      fixed_clock(),
    ))
  }
}

#[async_trait]
impl RecordStore for ScriptedGateway {
  async fn create(&self, location: &str, record: &NewProduct) -> GatewayResult<ProductId> {
    self.created.lock().push((location.to_string(), record.clone()));
    self.enter_persist().await?;
    Ok(ProductId::new(format!("generated-{}", self.created.lock().len())))
  }

  async fn update(&self, path: &str, record: &ProductUpdate) -> GatewayResult<()> {
    self.updated.lock().push((path.to_string(), record.clone()));
    self.enter_persist().await
  }
}

#[async_trait]
impl ImageStore for ScriptedGateway {
  async fn upload_image(&self, _file: &ImageFile, name: &str) -> GatewayResult<String> {
    self.uploads.lock().push(name.to_string());
    if let Some(err) = self.upload_failure.lock().clone() {
      return Err(err);
    }
    Ok(
      self
        .upload_url_override
        .lock()
        .clone()
        .unwrap_or_else(|| format!("http://cdn/{}", name)),
    )
  }
}
