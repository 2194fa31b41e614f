// demos/catalog_console/src/main.rs

//! Scripted walk through the Create and Update product dialogs against an in-memory
//! store with simulated latency.

mod config;
mod errors;
mod services;

use crate::config::DemoConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::services::LatencyStore;
use catalog_flow::{
  GatewayError, ImageFile, InMemoryCatalogStore, ProductField, ProductModal, StoreOperation, SubmissionOutcome,
  SubmissionWorkflow,
};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting catalog console demo...");
  let config = DemoConfig::from_env()?;

  let memory = Arc::new(InMemoryCatalogStore::default());
  if config.fail_first_upload {
    memory.fail_next(
      StoreOperation::UploadImage,
      GatewayError::Unavailable("simulated storage outage".to_string()),
    );
  }
  let store = Arc::new(LatencyStore::new(memory.clone(), config.latency_ms));
  let workflow = Arc::new(SubmissionWorkflow::new(
    store.clone(),
    store,
    config.catalog.paths(),
    config.catalog.validator(),
  ));

  println!("Categories:");
  for category in config.catalog.categories.iter() {
    println!("  {:<12} {}", category.value, category.name);
  }

  let created = run_create_dialog(&workflow).await?;
  println!("\nCreated:\n{}", serde_json::to_string_pretty(&created)?);

  let updated = run_update_dialog(&workflow, created).await?;
  println!("\nUpdated:\n{}", serde_json::to_string_pretty(&updated)?);

  let stored = memory.list(config.catalog.paths().collection()).map_err(|e| AppError::Unexpected(e.to_string()))?;
  println!("\nStore now holds {} product(s).", stored.len());
  Ok(())
}

async fn run_create_dialog(workflow: &Arc<SubmissionWorkflow>) -> AppResult<catalog_flow::PersistedProduct> {
  let modal = ProductModal::create(workflow.clone());
  modal.open();
  println!("\n[create] submit enabled on an empty form: {}", modal.can_submit());

  for (field, value) in [
    (ProductField::ProductName, "Widget"),
    (ProductField::Category, "tools"),
    (ProductField::Price, "10"),
    (ProductField::Cost, "5"),
    (ProductField::StockAmount, "100"),
    (ProductField::Options, "red, blue"),
  ] {
    modal.set_field(field, value);
  }
  println!("[create] submit enabled once filled: {}", modal.can_submit());

  modal
    .stage_image(ImageFile::new("widget.png", "image/png", vec![0x89, b'P', b'N', b'G']), "widget-front")
    .map_err(|e| AppError::Unexpected(e.to_string()))?;

  // The first upload may be scripted to fail; the dialog keeps everything for a retry.
  for attempt in 1..=2 {
    match modal.submit().await? {
      SubmissionOutcome::Saved(product) => {
        println!("[create] attempt {}: saved, dialog open = {}", attempt, modal.is_open());
        return Ok(product);
      }
      other => {
        let notice = modal.last_failure().map(|n| n.message).unwrap_or_default();
        println!("[create] attempt {}: not saved ({}), dialog open = {}", attempt, notice, modal.is_open());
        tracing::warn!(?other, "Create attempt did not save.");
      }
    }
  }
  Err(AppError::Unexpected("create dialog never saved".to_string()))
}

async fn run_update_dialog(
  workflow: &Arc<SubmissionWorkflow>,
  product: catalog_flow::PersistedProduct,
) -> AppResult<catalog_flow::PersistedProduct> {
  let modal = ProductModal::update(workflow.clone(), product);
  modal.open();
  modal.set_field(ProductField::Price, "12.50");
  modal.set_field(ProductField::StockAmount, "80");

  match modal.submit().await? {
    SubmissionOutcome::Saved(product) => {
      println!("\n[update] saved; image kept: {}", product.image);
      Ok(product)
    }
    other => Err(AppError::Unexpected(format!("update did not save: {:?}", other))),
  }
}
