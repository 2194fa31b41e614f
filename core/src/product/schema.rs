// catalog_flow/src/product/schema.rs

//! Field-level validation of the product form.
//!
//! Every field arrives as text. A record is valid when every field is non-empty after
//! trimming and the numeric fields parse to a finite number inside the policy bounds.
//! No cross-field rules apply (a cost above the price is accepted).

use crate::product::category::CategoryList;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The editable fields of a product, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductField {
  ProductName,
  Category,
  Price,
  Cost,
  StockAmount,
  Options,
}

impl ProductField {
  pub const ALL: [ProductField; 6] = [
    ProductField::ProductName,
    ProductField::Category,
    ProductField::Price,
    ProductField::Cost,
    ProductField::StockAmount,
    ProductField::Options,
  ];

  /// Key used for this field at the storage boundary.
  pub fn key(self) -> &'static str {
    match self {
      ProductField::ProductName => "productName",
      ProductField::Category => "category",
      ProductField::Price => "price",
      ProductField::Cost => "cost",
      ProductField::StockAmount => "stockAmount",
      ProductField::Options => "options",
    }
  }

  pub fn is_numeric(self) -> bool {
    matches!(self, ProductField::Price | ProductField::Cost | ProductField::StockAmount)
  }
}

impl fmt::Display for ProductField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Raw form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub product_name: String,
  pub category: String,
  pub price: String,
  pub cost: String,
  pub stock_amount: String,
  pub options: String,
}

impl ProductInput {
  pub fn get(&self, field: ProductField) -> &str {
    match field {
      ProductField::ProductName => &self.product_name,
      ProductField::Category => &self.category,
      ProductField::Price => &self.price,
      ProductField::Cost => &self.cost,
      ProductField::StockAmount => &self.stock_amount,
      ProductField::Options => &self.options,
    }
  }

  pub fn set(&mut self, field: ProductField, value: impl Into<String>) {
    let slot = match field {
      ProductField::ProductName => &mut self.product_name,
      ProductField::Category => &mut self.category,
      ProductField::Price => &mut self.price,
      ProductField::Cost => &mut self.cost,
      ProductField::StockAmount => &mut self.stock_amount,
      ProductField::Options => &mut self.options,
    };
    *slot = value.into();
  }

  /// Builder-style `set`, mostly for fixtures.
  pub fn with(mut self, field: ProductField, value: impl Into<String>) -> Self {
    self.set(field, value);
    self
  }
}

/// A validated product: the editable fields, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
  pub product_name: String,
  pub category: String,
  pub price: String,
  pub cost: String,
  pub stock_amount: String,
  pub options: String,
}

impl ProductRecord {
  /// The comma-delimited options, trimmed, without empty entries.
  pub fn option_list(&self) -> Vec<&str> {
    self.options.split(',').map(str::trim).filter(|o| !o.is_empty()).collect()
  }
}

impl From<&ProductRecord> for ProductInput {
  fn from(record: &ProductRecord) -> Self {
    Self {
      product_name: record.product_name.clone(),
      category: record.category.clone(),
      price: record.price.clone(),
      cost: record.cost.clone(),
      stock_amount: record.stock_amount.clone(),
      options: record.options.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
  Required,
  NotANumber,
  OutOfRange { min: f64, max: f64 },
  UnknownCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
  pub field: ProductField,
  pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      FieldErrorKind::Required => write!(f, "{} is required", self.field),
      FieldErrorKind::NotANumber => write!(f, "{} must be a number", self.field),
      FieldErrorKind::OutOfRange { min, max } => write!(f, "{} must be between {} and {}", self.field, min, max),
      FieldErrorKind::UnknownCategory => write!(f, "{} is not one of the configured categories", self.field),
    }
  }
}

/// Per-field errors of one validation pass, in form order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn errors(&self) -> &[FieldError] {
    &self.0
  }

  pub fn for_field(&self, field: ProductField) -> Option<&FieldError> {
    self.0.iter().find(|e| e.field == field)
  }

  pub fn fields(&self) -> impl Iterator<Item = ProductField> + '_ {
    self.0.iter().map(|e| e.field)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, err) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}", err)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationPolicy {
  pub numeric_min: f64,
  pub numeric_max: f64,
  /// When set, `category` must be one of the configured category values.
  pub enforce_category_membership: bool,
}

impl Default for ValidationPolicy {
  fn default() -> Self {
    Self {
      numeric_min: 0.0,
      numeric_max: 9999.0,
      enforce_category_membership: false,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ProductValidator {
  policy: ValidationPolicy,
  categories: CategoryList,
}

impl ProductValidator {
  pub fn new(policy: ValidationPolicy, categories: CategoryList) -> Self {
    Self { policy, categories }
  }

  pub fn policy(&self) -> &ValidationPolicy {
    &self.policy
  }

  pub fn categories(&self) -> &CategoryList {
    &self.categories
  }

  pub fn validate(&self, input: &ProductInput) -> Result<ProductRecord, ValidationErrors> {
    let errors: Vec<FieldError> = ProductField::ALL
      .iter()
      .filter_map(|&field| self.check_field(field, input.get(field)).err())
      .collect();
    if !errors.is_empty() {
      return Err(ValidationErrors(errors));
    }

    let trimmed = |field| input.get(field).trim().to_string();
    Ok(ProductRecord {
      product_name: trimmed(ProductField::ProductName),
      category: trimmed(ProductField::Category),
      price: trimmed(ProductField::Price),
      cost: trimmed(ProductField::Cost),
      stock_amount: trimmed(ProductField::StockAmount),
      options: trimmed(ProductField::Options),
    })
  }

  /// Whether `input` would pass `validate`. Re-evaluated on every form change.
  pub fn is_submittable(&self, input: &ProductInput) -> bool {
    ProductField::ALL
      .iter()
      .all(|&field| self.check_field(field, input.get(field)).is_ok())
  }

  fn check_field(&self, field: ProductField, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    let fail = |kind| Err(FieldError { field, kind });
    if value.is_empty() {
      return fail(FieldErrorKind::Required);
    }
    if field.is_numeric() {
      let number = match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => return fail(FieldErrorKind::NotANumber),
      };
      if number < self.policy.numeric_min || number > self.policy.numeric_max {
        return fail(FieldErrorKind::OutOfRange {
          min: self.policy.numeric_min,
          max: self.policy.numeric_max,
        });
      }
    }
    if field == ProductField::Category && self.policy.enforce_category_membership && !self.categories.contains(value)
    {
      return fail(FieldErrorKind::UnknownCategory);
    }
    Ok(())
  }
}
