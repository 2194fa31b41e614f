// catalog_flow/src/product/mod.rs

//! Product data: categories, form validation and the stored record shapes.

pub mod category;
pub mod record;
pub mod schema;

pub use category::{Category, CategoryList};
pub use record::{EpochMillis, NewProduct, PersistedProduct, ProductId, ProductUpdate};
pub use schema::{
  FieldError, FieldErrorKind, ProductField, ProductInput, ProductRecord, ProductValidator, ValidationErrors,
  ValidationPolicy,
};
