// catalog_flow/src/error.rs

use crate::gateway::GatewayError;
use crate::product::schema::ValidationErrors;
use crate::staging::StagingError;
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors raised by the step engine itself.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in step handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal pipeline error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for PipelineError {
  fn from(err: AnyhowError) -> Self {
    PipelineError::HandlerError { source: err }
  }
}

/// Crate-level error type. Every failure path of a submission ends up here before it
/// is folded into a `SubmissionOutcome`.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Validation failed: {0}")]
  Validation(#[from] ValidationErrors),

  #[error("Image upload failed: {source}")]
  ImageUpload {
    #[source]
    source: GatewayError,
  },

  #[error("Persisting the product failed: {source}")]
  Persist {
    #[source]
    source: GatewayError,
  },

  #[error("Image staging error: {0}")]
  Staging(#[from] StagingError),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
