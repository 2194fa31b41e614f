// catalog_flow/src/workflow/context.rs

//! Data carried through one submission run.

use crate::gateway::{ImageStore, ProductPaths, RecordStore};
use crate::product::{EpochMillis, NewProduct, PersistedProduct, ProductId, ProductInput, ProductRecord, ProductUpdate, ProductValidator};
use crate::staging::StagedImage;
use crate::workflow::clock::Clock;
use std::sync::Arc;

/// Whether a submission adds a product or overwrites an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionMode {
  Create,
  Update(PersistedProduct),
}

impl SubmissionMode {
  pub fn label(&self) -> &'static str {
    match self {
      SubmissionMode::Create => "create",
      SubmissionMode::Update(_) => "update",
    }
  }
}

/// Progress of a submission. `Idle` until the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
  #[default]
  Idle,
  Validating,
  UploadingImage,
  Persisting,
  Succeeded,
  Failed,
}

impl SubmissionState {
  pub fn is_in_flight(self) -> bool {
    matches!(
      self,
      SubmissionState::Validating | SubmissionState::UploadingImage | SubmissionState::Persisting
    )
  }
}

/// Collaborators shared by every run of a workflow.
#[derive(Clone)]
pub struct SubmissionServices {
  pub records: Arc<dyn RecordStore>,
  pub images: Arc<dyn ImageStore>,
  pub paths: ProductPaths,
  pub validator: Arc<ProductValidator>,
  pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SubmissionServices {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubmissionServices")
      .field("paths", &self.paths)
      .field("validator", &self.validator)
      .finish_non_exhaustive()
  }
}

/// The write a run is about to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
  Create { location: String, record: NewProduct },
  Update { path: String, record: ProductUpdate },
}

#[derive(Debug, Clone)]
pub struct SubmissionCtxData {
  pub services: SubmissionServices,
  pub mode: SubmissionMode,
  pub input: ProductInput,
  /// Snapshot of the staged image taken when the run was set up.
  pub staged_image: Option<StagedImage>,
  pub state: SubmissionState,
  pub validated: Option<ProductRecord>,
  pub submitted_at: Option<EpochMillis>,
  pub uploaded_image_url: Option<String>,
  pub pending_write: Option<PendingWrite>,
  pub saved_id: Option<ProductId>,
}

impl SubmissionCtxData {
  pub fn new(
    services: SubmissionServices,
    mode: SubmissionMode,
    input: ProductInput,
    staged_image: Option<StagedImage>,
  ) -> Self {
    Self {
      services,
      mode,
      input,
      staged_image,
      state: SubmissionState::Idle,
      validated: None,
      submitted_at: None,
      uploaded_image_url: None,
      pending_write: None,
      saved_id: None,
    }
  }
}
