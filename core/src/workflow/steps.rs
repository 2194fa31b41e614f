// catalog_flow/src/workflow/steps.rs

//! Step handlers of the submission pipeline.
//!
//! Each handler copies what it needs out of the context, drops the guard, then awaits.

use crate::core::{ContextData, StepControl};
use crate::error::{CatalogError, CatalogResult};
use crate::gateway::GatewayError;
use crate::product::{NewProduct, PersistedProduct, ProductUpdate};
use crate::workflow::context::{PendingWrite, SubmissionCtxData, SubmissionMode, SubmissionState};
use tracing::{debug, info, instrument, warn};

pub const VALIDATE_STEP: &str = "validate_product_input";
pub const UPLOAD_STEP: &str = "upload_staged_image";
pub const ASSEMBLE_STEP: &str = "assemble_record";
pub const PERSIST_STEP: &str = "persist_record";

/// Re-checks the form. The submit control is normally disabled for invalid input,
/// so reaching this with bad data means a caller skipped that check.
pub async fn validate_input(ctx: ContextData<SubmissionCtxData>) -> CatalogResult<StepControl> {
  let mut guard = ctx.write();
  guard.state = SubmissionState::Validating;
  let result = guard.services.validator.validate(&guard.input);
  match result {
    Ok(record) => {
      guard.validated = Some(record);
      Ok(StepControl::Continue)
    }
    Err(errors) => {
      warn!(%errors, "Submission refused: form is not valid.");
      Err(CatalogError::Validation(errors))
    }
  }
}

/// Captures the single timestamp used for both `dateCreated` and `lastModified`.
pub async fn stamp_submission_time(ctx: ContextData<SubmissionCtxData>) -> CatalogResult<StepControl> {
  let mut guard = ctx.write();
  let now = guard.services.clock.now_millis();
  guard.submitted_at = Some(now);
  debug!(now, "Submission time captured.");
  Ok(StepControl::Continue)
}

pub fn no_image_staged(ctx: &ContextData<SubmissionCtxData>) -> bool {
  ctx.with(|data| data.staged_image.is_none())
}

/// Uploads the staged image. A failed or empty upload aborts the run before any
/// record is written.
#[instrument(name = "step::upload_staged_image", skip_all)]
pub async fn upload_staged_image(ctx: ContextData<SubmissionCtxData>) -> CatalogResult<StepControl> {
  let (images, staged) = {
    let mut guard = ctx.write();
    guard.state = SubmissionState::UploadingImage;
    (guard.services.images.clone(), guard.staged_image.clone())
  };
  let Some(staged) = staged else {
    return Ok(StepControl::Continue);
  };

  let url = images
    .upload_image(&staged.file, &staged.display_name)
    .await
    .and_then(|url| {
      if url.trim().is_empty() {
        Err(GatewayError::Rejected("image store returned an empty URL".to_string()))
      } else {
        Ok(url)
      }
    })
    .map_err(|source| CatalogError::ImageUpload { source })?;

  info!(%url, name = %staged.display_name, "Staged image uploaded.");
  ctx.write().uploaded_image_url = Some(url);
  Ok(StepControl::Continue)
}

/// Builds the record to write.
///
/// Create: validated fields, both timestamps set to the submission time, the uploaded
/// URL or an empty image. Update: validated fields, `lastModified`, and the uploaded
/// URL falling back to the product's current image. `dateCreated` is never sent on
/// update.
pub async fn assemble_record(ctx: ContextData<SubmissionCtxData>) -> CatalogResult<StepControl> {
  let mut guard = ctx.write();
  let (Some(fields), Some(now)) = (guard.validated.clone(), guard.submitted_at) else {
    return Err(CatalogError::Workflow {
      source: crate::error::PipelineError::Internal("record assembled before validation".to_string()),
    });
  };
  let uploaded = guard.uploaded_image_url.clone().filter(|url| !url.is_empty());

  let write = match &guard.mode {
    SubmissionMode::Create => PendingWrite::Create {
      location: guard.services.paths.collection().to_string(),
      record: NewProduct {
        fields,
        date_created: now,
        last_modified: now,
        image: uploaded.unwrap_or_default(),
      },
    },
    SubmissionMode::Update(existing) => PendingWrite::Update {
      path: guard.services.paths.record(&existing.id),
      record: ProductUpdate {
        fields,
        last_modified: now,
        image: uploaded.unwrap_or_else(|| existing.image.clone()),
      },
    },
  };
  guard.pending_write = Some(write);
  Ok(StepControl::Continue)
}

#[instrument(name = "step::persist_record", skip_all)]
pub async fn persist_record(ctx: ContextData<SubmissionCtxData>) -> CatalogResult<StepControl> {
  let (records, write, mode) = {
    let mut guard = ctx.write();
    guard.state = SubmissionState::Persisting;
    (guard.services.records.clone(), guard.pending_write.clone(), guard.mode.clone())
  };

  let saved_id = match (write, mode) {
    (Some(PendingWrite::Create { location, record }), SubmissionMode::Create) => records
      .create(&location, &record)
      .await
      .map_err(|source| CatalogError::Persist { source })?,
    (Some(PendingWrite::Update { path, record }), SubmissionMode::Update(existing)) => {
      records
        .update(&path, &record)
        .await
        .map_err(|source| CatalogError::Persist { source })?;
      existing.id
    }
    _ => {
      return Err(CatalogError::Workflow {
        source: crate::error::PipelineError::Internal("no write assembled for this mode".to_string()),
      })
    }
  };

  info!(id = %saved_id, "Product persisted.");
  let mut guard = ctx.write();
  guard.saved_id = Some(saved_id);
  guard.state = SubmissionState::Succeeded;
  Ok(StepControl::Continue)
}

/// The product as it reads after a successful run.
pub(crate) fn saved_product(data: &SubmissionCtxData) -> Option<PersistedProduct> {
  let id = data.saved_id.clone()?;
  match (data.pending_write.clone()?, &data.mode) {
    (PendingWrite::Create { record, .. }, _) => Some(PersistedProduct::from_new(id, record)),
    (PendingWrite::Update { record, .. }, SubmissionMode::Update(existing)) => {
      let mut product = existing.clone();
      product.apply(record);
      Some(product)
    }
    (PendingWrite::Update { .. }, SubmissionMode::Create) => None,
  }
}
