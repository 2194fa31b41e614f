// catalog_flow/src/modal.rs

//! Headless Create/Update product dialogs.
//!
//! A `ProductModal` owns the form, the image staging and the open/closed state of one
//! dialog, and drives `SubmissionWorkflow` when the user submits. Success resets the
//! form, clears staging and closes the dialog; any failure leaves all three untouched
//! so the user can retry.

use crate::core::ContextData;
use crate::error::CatalogError;
use crate::product::{PersistedProduct, ProductField, ProductInput, ValidationErrors};
use crate::staging::{ImageFile, ImageStaging, StagingError};
use crate::workflow::{SubmissionCtxData, SubmissionMode, SubmissionOutcome, SubmissionState, SubmissionWorkflow};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why `submit` did not start a submission, or why it could not finish one.
#[derive(Debug, Error)]
pub enum SubmitRejected {
  #[error("form is not valid: {0}")]
  Invalid(ValidationErrors),

  #[error("a submission is already in flight")]
  AlreadySubmitting,

  #[error(transparent)]
  Workflow(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
  Validation,
  ImageUpload,
  Persist,
}

/// Last submission failure, kept until the next successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
  pub stage: FailedStage,
  pub message: String,
}

impl FailureNotice {
  fn from_outcome(outcome: &SubmissionOutcome) -> Option<Self> {
    let (stage, message) = match outcome {
      SubmissionOutcome::Saved(_) => return None,
      SubmissionOutcome::Rejected(errors) => (FailedStage::Validation, errors.to_string()),
      SubmissionOutcome::UploadFailed(err) => (FailedStage::ImageUpload, err.to_string()),
      SubmissionOutcome::PersistFailed(err) => (FailedStage::Persist, err.to_string()),
    };
    Some(Self { stage, message })
  }
}

#[derive(Debug)]
struct ModalState {
  product: Option<PersistedProduct>,
  open: bool,
  form: ProductInput,
  staging: ImageStaging,
  errors: Option<ValidationErrors>,
  last_failure: Option<FailureNotice>,
  active_run: Option<ContextData<SubmissionCtxData>>,
}

impl ModalState {
  fn defaults(&self) -> ProductInput {
    self.product.as_ref().map(PersistedProduct::to_input).unwrap_or_default()
  }

  fn mode(&self) -> SubmissionMode {
    match &self.product {
      Some(product) => SubmissionMode::Update(product.clone()),
      None => SubmissionMode::Create,
    }
  }
}

pub struct ProductModal {
  workflow: Arc<SubmissionWorkflow>,
  state: Mutex<ModalState>,
  submitting: AtomicBool,
  // Bumped whenever the dialog closes; a run started in an older session is stale.
  session: AtomicU64,
}

// Clears the active run and the in-flight flag, even if the submit future is dropped
// mid-run. Must be dropped after any `ModalState` guard of the same scope.
struct InFlight<'a> {
  submitting: &'a AtomicBool,
  state: &'a Mutex<ModalState>,
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.state.lock().active_run = None;
    self.submitting.store(false, Ordering::Release);
  }
}

impl ProductModal {
  /// Dialog that adds a new product. The form starts empty.
  pub fn create(workflow: Arc<SubmissionWorkflow>) -> Self {
    Self::with_product(workflow, None)
  }

  /// Dialog that edits `product`. The form starts with the product's values.
  pub fn update(workflow: Arc<SubmissionWorkflow>, product: PersistedProduct) -> Self {
    Self::with_product(workflow, Some(product))
  }

  fn with_product(workflow: Arc<SubmissionWorkflow>, product: Option<PersistedProduct>) -> Self {
    let form = product.as_ref().map(PersistedProduct::to_input).unwrap_or_default();
    let errors = workflow.validator().validate(&form).err();
    Self {
      workflow,
      state: Mutex::new(ModalState {
        product,
        open: false,
        form,
        staging: ImageStaging::new(),
        errors,
        last_failure: None,
        active_run: None,
      }),
      submitting: AtomicBool::new(false),
      session: AtomicU64::new(0),
    }
  }

  pub fn mode_label(&self) -> &'static str {
    if self.state.lock().product.is_some() {
      "update"
    } else {
      "create"
    }
  }

  pub fn open(&self) {
    self.state.lock().open = true;
  }

  /// Closes the dialog. A submission still in flight keeps running; its success
  /// still resets the form and staging but no longer closes the dialog.
  pub fn close(&self) {
    let mut state = self.state.lock();
    if state.open {
      state.open = false;
      self.session.fetch_add(1, Ordering::AcqRel);
      debug!(submitting = self.is_submitting(), "Dialog closed.");
    }
  }

  pub fn is_open(&self) -> bool {
    self.state.lock().open
  }

  /// Sets one field and recomputes form validity.
  pub fn set_field(&self, field: ProductField, value: impl Into<String>) {
    let mut state = self.state.lock();
    state.form.set(field, value);
    state.errors = self.workflow.validator().validate(&state.form).err();
  }

  pub fn field(&self, field: ProductField) -> String {
    self.state.lock().form.get(field).to_string()
  }

  pub fn form(&self) -> ProductInput {
    self.state.lock().form.clone()
  }

  pub fn field_errors(&self) -> Option<ValidationErrors> {
    self.state.lock().errors.clone()
  }

  pub fn is_valid(&self) -> bool {
    self.state.lock().errors.is_none()
  }

  pub fn is_submitting(&self) -> bool {
    self.submitting.load(Ordering::Acquire)
  }

  /// Whether the submit control is enabled.
  pub fn can_submit(&self) -> bool {
    self.is_valid() && !self.is_submitting()
  }

  /// Progress of the submission in flight, or `Idle`.
  pub fn submission_state(&self) -> SubmissionState {
    let run = self.state.lock().active_run.clone();
    run.map_or(SubmissionState::Idle, |ctx| ctx.with(|data| data.state))
  }

  pub fn stage_image(&self, file: ImageFile, display_name: impl Into<String>) -> Result<(), StagingError> {
    if self.is_submitting() {
      return Err(StagingError::SubmissionInFlight);
    }
    self.state.lock().staging.stage(file, display_name)
  }

  pub fn clear_image(&self) -> Result<(), StagingError> {
    if self.is_submitting() {
      return Err(StagingError::SubmissionInFlight);
    }
    self.state.lock().staging.clear();
    Ok(())
  }

  /// Name shown by the file input; `None` means "no file selected".
  pub fn staged_image_name(&self) -> Option<String> {
    self.state.lock().staging.display_name().map(str::to_string)
  }

  pub fn last_failure(&self) -> Option<FailureNotice> {
    self.state.lock().last_failure.clone()
  }

  /// The product an update dialog edits, as last saved.
  pub fn product(&self) -> Option<PersistedProduct> {
    self.state.lock().product.clone()
  }

  /// Submits the form.
  ///
  /// Refuses to start when the form is invalid or another submission is in flight.
  /// Otherwise returns how the submission ended; expected failures come back as
  /// `Ok` with a non-saved outcome.
  #[instrument(name = "ProductModal::submit", skip(self), fields(mode = self.mode_label()))]
  pub async fn submit(&self) -> Result<SubmissionOutcome, SubmitRejected> {
    if let Some(errors) = self.field_errors() {
      return Err(SubmitRejected::Invalid(errors));
    }
    if self
      .submitting
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      return Err(SubmitRejected::AlreadySubmitting);
    }
    let _in_flight = InFlight {
      submitting: &self.submitting,
      state: &self.state,
    };
    let session = self.session.load(Ordering::Acquire);

    let ctx = {
      let mut state = self.state.lock();
      let ctx = self.workflow.prepare(state.mode(), &state.form, &state.staging);
      state.active_run = Some(ctx.clone());
      ctx
    };

    let result = self.workflow.run(ctx).await;

    let mut state = self.state.lock();
    let outcome = match result {
      Ok(outcome) => outcome,
      Err(err) => {
        warn!(error = %err, "Submission aborted by a workflow error.");
        return Err(SubmitRejected::Workflow(err));
      }
    };

    let Some(saved) = outcome.saved().cloned() else {
      state.last_failure = FailureNotice::from_outcome(&outcome);
      return Ok(outcome);
    };

    if state.product.is_some() {
      state.product = Some(saved);
    }
    // The form and staging describe a record that is now persisted.
    state.form = state.defaults();
    state.errors = self.workflow.validator().validate(&state.form).err();
    state.staging.clear();
    state.last_failure = None;

    if self.session.load(Ordering::Acquire) != session {
      info!("Dialog was closed during the submission; form reset, dialog left as it is.");
      return Ok(outcome);
    }
    state.open = false;
    self.session.fetch_add(1, Ordering::AcqRel);
    info!("Submission saved; form reset and dialog closed.");
    Ok(outcome)
  }
}

impl std::fmt::Debug for ProductModal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProductModal")
      .field("mode", &self.mode_label())
      .field("submitting", &self.is_submitting())
      .field("state", &*self.state.lock())
      .finish()
  }
}
