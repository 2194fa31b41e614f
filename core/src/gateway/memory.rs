// catalog_flow/src/gateway/memory.rs

//! Process-local store implementing both gateway traits.
//!
//! Records are kept as JSON documents keyed by path, the way a remote key-value
//! database would hold them. Failures can be scripted per operation.

use crate::gateway::{GatewayError, GatewayResult, ImageStore, RecordStore};
use crate::product::{NewProduct, PersistedProduct, ProductId, ProductUpdate};
use crate::staging::ImageFile;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
  Create,
  Update,
  UploadImage,
}

#[derive(Debug, Default)]
struct StoreState {
  documents: BTreeMap<String, Value>,
  images: BTreeMap<String, usize>,
  scripted_failures: HashMap<StoreOperation, VecDeque<GatewayError>>,
  calls: HashMap<StoreOperation, usize>,
}

impl StoreState {
  // Counts the call, then pops a scripted failure if one is queued.
  fn begin(&mut self, op: StoreOperation) -> GatewayResult<()> {
    *self.calls.entry(op).or_default() += 1;
    match self.scripted_failures.get_mut(&op).and_then(VecDeque::pop_front) {
      Some(err) => {
        warn!(?op, error = %err, "Scripted store failure.");
        Err(err)
      }
      None => Ok(()),
    }
  }
}

#[derive(Debug)]
pub struct InMemoryCatalogStore {
  image_base_url: String,
  state: Mutex<StoreState>,
}

impl Default for InMemoryCatalogStore {
  fn default() -> Self {
    Self::new("memory://images")
  }
}

impl InMemoryCatalogStore {
  pub fn new(image_base_url: impl Into<String>) -> Self {
    Self {
      image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
      state: Mutex::new(StoreState::default()),
    }
  }

  /// Makes the next call of `op` fail with `err`. Queued failures are consumed in order.
  pub fn fail_next(&self, op: StoreOperation, err: GatewayError) {
    self.state.lock().scripted_failures.entry(op).or_default().push_back(err);
  }

  /// Number of times `op` was attempted, failed attempts included.
  pub fn calls(&self, op: StoreOperation) -> usize {
    self.state.lock().calls.get(&op).copied().unwrap_or(0)
  }

  /// Stores a raw document at `path`, bypassing the create call.
  pub fn seed_document(&self, path: &str, document: Value) {
    self.state.lock().documents.insert(path.to_string(), document);
  }

  pub fn get(&self, path: &str) -> GatewayResult<PersistedProduct> {
    let document = self
      .state
      .lock()
      .documents
      .get(path)
      .cloned()
      .ok_or_else(|| GatewayError::NotFound { path: path.to_string() })?;
    let id = path.rsplit('/').next().unwrap_or(path);
    decode(id, document)
  }

  /// Every record stored directly under `location`, ordered by path.
  pub fn list(&self, location: &str) -> GatewayResult<Vec<PersistedProduct>> {
    let prefix = format!("{}/", location);
    let documents: Vec<(String, Value)> = self
      .state
      .lock()
      .documents
      .iter()
      .filter_map(|(path, doc)| {
        let id = path.strip_prefix(&prefix)?;
        (!id.contains('/')).then(|| (id.to_string(), doc.clone()))
      })
      .collect();
    documents.into_iter().map(|(id, doc)| decode(&id, doc)).collect()
  }

  pub fn has_image(&self, url: &str) -> bool {
    self.state.lock().images.contains_key(url)
  }
}

fn decode(id: &str, document: Value) -> GatewayResult<PersistedProduct> {
  let mut object = match document {
    Value::Object(object) => object,
    other => return Err(GatewayError::Serialization(format!("expected an object, found {}", other))),
  };
  object.insert("id".to_string(), Value::String(id.to_string()));
  Ok(serde_json::from_value(Value::Object(object))?)
}

fn encode<T: serde::Serialize>(record: &T) -> GatewayResult<Map<String, Value>> {
  match serde_json::to_value(record)? {
    Value::Object(object) => Ok(object),
    other => Err(GatewayError::Serialization(format!("expected an object, found {}", other))),
  }
}

#[async_trait]
impl RecordStore for InMemoryCatalogStore {
  #[instrument(name = "memory_store::create", skip(self, record), err)]
  async fn create(&self, location: &str, record: &NewProduct) -> GatewayResult<ProductId> {
    let mut state = self.state.lock();
    state.begin(StoreOperation::Create)?;
    let document = encode(record)?;
    let id = ProductId::new(Uuid::new_v4().simple().to_string());
    state.documents.insert(format!("{}/{}", location, id), Value::Object(document));
    info!(%id, "Product created.");
    Ok(id)
  }

  #[instrument(name = "memory_store::update", skip(self, record), err)]
  async fn update(&self, path: &str, record: &ProductUpdate) -> GatewayResult<()> {
    let mut state = self.state.lock();
    state.begin(StoreOperation::Update)?;
    let changes = encode(record)?;
    match state.documents.get_mut(path) {
      Some(Value::Object(document)) => {
        // Full-field overwrite; keys the update does not carry (dateCreated) survive.
        document.extend(changes);
        info!("Product updated.");
        Ok(())
      }
      Some(_) => Err(GatewayError::Serialization(format!("document at '{}' is not an object", path))),
      None => Err(GatewayError::NotFound { path: path.to_string() }),
    }
  }
}

#[async_trait]
impl ImageStore for InMemoryCatalogStore {
  #[instrument(name = "memory_store::upload_image", skip(self, file), fields(size = file.len()), err)]
  async fn upload_image(&self, file: &ImageFile, name: &str) -> GatewayResult<String> {
    let mut state = self.state.lock();
    state.begin(StoreOperation::UploadImage)?;
    let object_name = if name.trim().is_empty() {
      Uuid::new_v4().simple().to_string()
    } else {
      name.trim().to_string()
    };
    let url = format!("{}/{}", self.image_base_url, object_name);
    state.images.insert(url.clone(), file.len());
    info!(%url, "Image uploaded.");
    Ok(url)
  }
}
