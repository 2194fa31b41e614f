// catalog_flow/src/product/record.rs

//! Record shapes at the storage boundary.
//!
//! `NewProduct` is what a create writes, `ProductUpdate` is the full-field overwrite an
//! update writes (it has no `dateCreated`, so the stored creation time is never sent),
//! and `PersistedProduct` is what the store hands back.

use crate::product::schema::{ProductInput, ProductRecord};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Store-assigned identity of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  #[serde(flatten)]
  pub fields: ProductRecord,
  pub date_created: EpochMillis,
  pub last_modified: EpochMillis,
  /// Download URL of the product image; empty when there is none.
  pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
  #[serde(flatten)]
  pub fields: ProductRecord,
  pub last_modified: EpochMillis,
  pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedProduct {
  pub id: ProductId,
  #[serde(flatten)]
  pub fields: ProductRecord,
  pub date_created: EpochMillis,
  pub last_modified: EpochMillis,
  /// Empty when the product has no image. Older rows store `false` here.
  #[serde(default, deserialize_with = "image_or_false")]
  pub image: String,
}

impl PersistedProduct {
  pub fn from_new(id: ProductId, new: NewProduct) -> Self {
    Self {
      id,
      fields: new.fields,
      date_created: new.date_created,
      last_modified: new.last_modified,
      image: new.image,
    }
  }

  /// Applies a full-field overwrite. Identity and `date_created` are kept.
  pub fn apply(&mut self, update: ProductUpdate) {
    self.fields = update.fields;
    self.last_modified = update.last_modified;
    self.image = update.image;
  }

  pub fn has_image(&self) -> bool {
    !self.image.is_empty()
  }

  /// Form contents for editing this product.
  pub fn to_input(&self) -> ProductInput {
    ProductInput::from(&self.fields)
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageField {
  Url(String),
  Flag(bool),
  Missing(Option<()>),
}

fn image_or_false<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match ImageField::deserialize(deserializer)? {
    ImageField::Url(url) => url,
    ImageField::Flag(_) | ImageField::Missing(_) => String::new(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn fields() -> ProductRecord {
    ProductRecord {
      product_name: "Widget".into(),
      category: "tools".into(),
      price: "10".into(),
      cost: "5".into(),
      stock_amount: "100".into(),
      options: "red,blue".into(),
    }
  }

  #[test]
  fn new_product_serializes_flat_camel_case() {
    let new = NewProduct {
      fields: fields(),
      date_created: 42,
      last_modified: 42,
      image: String::new(),
    };
    assert_eq!(
      serde_json::to_value(&new).unwrap(),
      json!({
        "productName": "Widget", "category": "tools", "price": "10", "cost": "5",
        "stockAmount": "100", "options": "red,blue",
        "dateCreated": 42, "lastModified": 42, "image": ""
      })
    );
  }

  #[test]
  fn update_never_carries_date_created() {
    let update = ProductUpdate {
      fields: fields(),
      last_modified: 7,
      image: "http://old.png".into(),
    };
    let value = serde_json::to_value(&update).unwrap();
    assert!(value.get("dateCreated").is_none());
    assert_eq!(value["lastModified"], 7);
  }

  #[test]
  fn legacy_false_image_reads_as_no_image() {
    let stored = json!({
      "id": "p1", "productName": "Widget", "category": "tools", "price": "10", "cost": "5",
      "stockAmount": "100", "options": "red", "dateCreated": 1, "lastModified": 2, "image": false
    });
    let product: PersistedProduct = serde_json::from_value(stored).unwrap();
    assert!(!product.has_image());
    assert_eq!(product.id.as_str(), "p1");
  }

  #[test]
  fn apply_keeps_identity_and_creation_time() {
    let mut product = PersistedProduct::from_new(
      ProductId::new("p1"),
      NewProduct {
        fields: fields(),
        date_created: 1,
        last_modified: 1,
        image: String::new(),
      },
    );
    let mut changed = fields();
    changed.price = "12".into();
    product.apply(ProductUpdate {
      fields: changed,
      last_modified: 9,
      image: "http://new.png".into(),
    });
    assert_eq!(product.date_created, 1);
    assert_eq!(product.last_modified, 9);
    assert_eq!(product.fields.price, "12");
    assert!(product.has_image());
  }
}
