// catalog_flow/src/workflow/mod.rs

//! The create/update submission workflow.
//!
//! A submission runs four steps in order:
//!
//!  1. `validate_product_input` re-checks the form, then stamps the submission time.
//!  2. `upload_staged_image` uploads the staged file (skipped when nothing is staged).
//!  3. `assemble_record` builds the create or update payload.
//!  4. `persist_record` writes it to the record store.
//!
//! Upload always finishes before persisting starts. Any failure ends the run before
//! the record store is touched again, so a requested image that fails to upload never
//! leaves a record without it.

pub mod clock;
pub mod context;
pub mod steps;

use crate::core::{ContextData, PipelineOutcome, SkipCondition};
use crate::error::{CatalogError, CatalogResult, PipelineError};
use crate::gateway::{GatewayError, ImageStore, ProductPaths, RecordStore};
use crate::pipeline::Pipeline;
use crate::product::{PersistedProduct, ProductInput, ProductValidator, ValidationErrors};
use crate::staging::ImageStaging;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub use clock::{Clock, SystemClock};
pub use context::{PendingWrite, SubmissionCtxData, SubmissionMode, SubmissionServices, SubmissionState};

/// How a submission ended. Expected failures are values here, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
  /// The record was written. Holds the product as it now reads.
  Saved(PersistedProduct),
  /// The form did not validate; nothing was uploaded or written.
  Rejected(ValidationErrors),
  /// The staged image could not be uploaded; no record was written.
  UploadFailed(GatewayError),
  /// The record store refused or failed the write.
  PersistFailed(GatewayError),
}

impl SubmissionOutcome {
  pub fn is_saved(&self) -> bool {
    matches!(self, SubmissionOutcome::Saved(_))
  }

  pub fn saved(&self) -> Option<&PersistedProduct> {
    match self {
      SubmissionOutcome::Saved(product) => Some(product),
      _ => None,
    }
  }
}

pub struct SubmissionWorkflow {
  pipeline: Pipeline<SubmissionCtxData, CatalogError>,
  services: SubmissionServices,
}

impl SubmissionWorkflow {
  pub fn new(
    records: Arc<dyn RecordStore>,
    images: Arc<dyn ImageStore>,
    paths: ProductPaths,
    validator: ProductValidator,
  ) -> Self {
    Self::with_clock(records, images, paths, validator, Arc::new(SystemClock))
  }

  pub fn with_clock(
    records: Arc<dyn RecordStore>,
    images: Arc<dyn ImageStore>,
    paths: ProductPaths,
    validator: ProductValidator,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self {
      pipeline: build_submission_pipeline(),
      services: SubmissionServices {
        records,
        images,
        paths,
        validator: Arc::new(validator),
        clock,
      },
    }
  }

  pub fn validator(&self) -> &ProductValidator {
    &self.services.validator
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.pipeline.step_names()
  }

  /// Prepares the context for one run. The staged image is snapshotted; the caller's
  /// staging is never modified by the workflow.
  pub fn prepare(
    &self,
    mode: SubmissionMode,
    input: &ProductInput,
    staging: &ImageStaging,
  ) -> ContextData<SubmissionCtxData> {
    ContextData::new(SubmissionCtxData::new(
      self.services.clone(),
      mode,
      input.clone(),
      staging.staged().cloned(),
    ))
  }

  /// Validates, uploads the staged image if any, then creates or updates the record.
  pub async fn submit(
    &self,
    mode: SubmissionMode,
    input: &ProductInput,
    staging: &ImageStaging,
  ) -> CatalogResult<SubmissionOutcome> {
    self.run(self.prepare(mode, input, staging)).await
  }

  /// Runs a prepared context. `ctx` can be observed while the run is in flight.
  #[instrument(
    name = "SubmissionWorkflow::run",
    skip_all,
    fields(mode = %ctx.with(|d| d.mode.label()), image_staged = ctx.with(|d| d.staged_image.is_some()))
  )]
  pub async fn run(&self, ctx: ContextData<SubmissionCtxData>) -> CatalogResult<SubmissionOutcome> {
    let result = self.pipeline.run(ctx.clone()).await;
    let outcome = match result {
      Ok(PipelineOutcome::Completed) => match ctx.with(steps::saved_product) {
        Some(product) => SubmissionOutcome::Saved(product),
        None => {
          return Err(CatalogError::Workflow {
            source: PipelineError::Internal("pipeline completed without a saved record".to_string()),
          })
        }
      },
      Ok(PipelineOutcome::Halted { step }) => {
        ctx.write().state = SubmissionState::Failed;
        return Err(CatalogError::Workflow {
          source: PipelineError::Internal(format!("submission halted unexpectedly at '{}'", step)),
        });
      }
      Err(CatalogError::Validation(errors)) => SubmissionOutcome::Rejected(errors),
      Err(CatalogError::ImageUpload { source }) => SubmissionOutcome::UploadFailed(source),
      Err(CatalogError::Persist { source }) => SubmissionOutcome::PersistFailed(source),
      Err(other) => {
        ctx.write().state = SubmissionState::Failed;
        return Err(other);
      }
    };

    if outcome.is_saved() {
      info!("Submission succeeded.");
    } else {
      ctx.write().state = SubmissionState::Failed;
      warn!(?outcome, "Submission did not save.");
    }
    Ok(outcome)
  }
}

impl std::fmt::Debug for SubmissionWorkflow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubmissionWorkflow")
      .field("steps", &self.pipeline.step_names())
      .field("services", &self.services)
      .finish()
  }
}

fn build_submission_pipeline() -> Pipeline<SubmissionCtxData, CatalogError> {
  let skip_without_image: SkipCondition<SubmissionCtxData> = Arc::new(steps::no_image_staged);
  let mut pipeline = Pipeline::<SubmissionCtxData, CatalogError>::new(&[
    (steps::VALIDATE_STEP, None),
    (steps::UPLOAD_STEP, Some(skip_without_image)),
    (steps::ASSEMBLE_STEP, None),
    (steps::PERSIST_STEP, None),
  ]);
  pipeline.on_step(steps::VALIDATE_STEP, steps::validate_input);
  pipeline.after_step(steps::VALIDATE_STEP, steps::stamp_submission_time);
  pipeline.on_step(steps::UPLOAD_STEP, steps::upload_staged_image);
  pipeline.on_step(steps::ASSEMBLE_STEP, steps::assemble_record);
  pipeline.on_step(steps::PERSIST_STEP, steps::persist_record);
  pipeline
}
