// catalog_flow/src/product/category.rs

//! The category list offered by the category selector.
//!
//! The list is configuration data injected into the validator and the modal; there is
//! no process-wide constant.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// One selectable category: `value` is what gets stored, `name` is what gets shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub value: String,
  pub name: String,
}

impl Category {
  pub fn new(value: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      name: name.into(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryList(Vec<Category>);

impl CategoryList {
  pub fn new(categories: Vec<Category>) -> Self {
    Self(categories)
  }

  /// Parses the `value:Name,value:Name` configuration syntax.
  ///
  /// An entry without a `:` uses its value as display name. Blank entries are ignored.
  pub fn parse(raw: &str) -> Result<Self, CatalogError> {
    let mut categories = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
      let (value, name) = match entry.split_once(':') {
        Some((value, name)) => (value.trim(), name.trim()),
        None => (entry, entry),
      };
      if value.is_empty() {
        return Err(CatalogError::Config(format!("category entry '{}' has an empty value", entry)));
      }
      if categories.iter().any(|c: &Category| c.value == value) {
        return Err(CatalogError::Config(format!("duplicate category value '{}'", value)));
      }
      categories.push(Category::new(value, if name.is_empty() { value } else { name }));
    }
    Ok(Self(categories))
  }

  pub fn contains(&self, value: &str) -> bool {
    self.0.iter().any(|c| c.value == value)
  }

  pub fn name_for(&self, value: &str) -> Option<&str> {
    self.0.iter().find(|c| c.value == value).map(|c| c.name.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &Category> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl FromIterator<Category> for CategoryList {
  fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_value_name_pairs() {
    let list = CategoryList::parse("tools:Tools, apparel:Apparel & Shoes,food").unwrap();
    assert_eq!(list.len(), 3);
    assert!(list.contains("apparel"));
    assert_eq!(list.name_for("apparel"), Some("Apparel & Shoes"));
    assert_eq!(list.name_for("food"), Some("food"));
    assert_eq!(list.name_for("toys"), None);
  }

  #[test]
  fn blank_input_is_an_empty_list() {
    assert!(CategoryList::parse(" , ").unwrap().is_empty());
  }

  #[test]
  fn rejects_duplicates_and_empty_values() {
    assert!(matches!(CategoryList::parse("a:A,a:B"), Err(CatalogError::Config(_))));
    assert!(matches!(CategoryList::parse(":Nameless"), Err(CatalogError::Config(_))));
  }
}
