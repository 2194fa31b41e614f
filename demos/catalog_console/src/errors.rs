// demos/catalog_console/src/errors.rs

use catalog_flow::{CatalogError, SubmitRejected};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Catalog Error: {source}")]
  Catalog {
    #[from]
    source: CatalogError,
  },

  #[error("Submit refused: {source}")]
  Submit {
    #[from]
    source: SubmitRejected,
  },

  #[error("Unexpected outcome: {0}")]
  Unexpected(String),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
