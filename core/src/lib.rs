// catalog_flow/src/lib.rs

//! catalog_flow: headless create/update dialogs for product catalog records.
//!
//! The crate covers everything behind a product dialog except drawing it:
//!  - A field validator whose "can submit" predicate is re-run on every change.
//!  - Image staging for the one file picked in the form.
//!  - Async gateway traits for the record store and the image store, with explicit
//!    `Result`s instead of falsy return values.
//!  - The submission workflow, a named-step async pipeline:
//!    validate, upload the staged image, assemble the record, persist it.
//!  - `ProductModal`, the Create/Update dialog state that resets on success and keeps
//!    the user's input on failure.

pub mod config;
pub mod core;
pub mod error;
pub mod gateway;
pub mod modal;
pub mod pipeline;
pub mod product;
pub mod staging;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineOutcome, StepControl};
pub use crate::core::handler::Handler;
pub use crate::core::step::SkipCondition;
pub use crate::pipeline::Pipeline;

pub use crate::config::CatalogConfig;
pub use crate::error::{CatalogError, CatalogResult, PipelineError};
pub use crate::gateway::{GatewayError, GatewayResult, ImageStore, InMemoryCatalogStore, ProductPaths, RecordStore, StoreOperation};
pub use crate::modal::{FailedStage, FailureNotice, ProductModal, SubmitRejected};
pub use crate::product::{
  Category, CategoryList, FieldError, FieldErrorKind, NewProduct, PersistedProduct, ProductField, ProductId,
  ProductInput, ProductRecord, ProductUpdate, ProductValidator, ValidationErrors, ValidationPolicy,
};
pub use crate::staging::{ImageFile, ImageStaging, StagedImage, StagingError};
pub use crate::workflow::{Clock, SubmissionMode, SubmissionOutcome, SubmissionState, SubmissionWorkflow, SystemClock};
