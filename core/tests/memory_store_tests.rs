// tests/memory_store_tests.rs
mod common;

use catalog_flow::{
  CatalogConfig, GatewayError, ImageStaging, InMemoryCatalogStore, NewProduct, ProductModal, ProductUpdate, RecordStore,
  StoreOperation, SubmissionMode, SubmissionOutcome, SubmissionWorkflow,
};
use common::*;
use serial_test::serial;
use std::sync::Arc;

fn workflow_over(store: &Arc<InMemoryCatalogStore>) -> Arc<SubmissionWorkflow> {
  let config = CatalogConfig::default();
  Arc::new(SubmissionWorkflow::with_clock(
    store.clone(),
    store.clone(),
    config.paths(),
    config.validator(),
    fixed_clock(),
  ))
}

#[tokio::test]
#[serial]
async fn create_then_update_round_trips_through_the_store() {
  setup_tracing();
  let store = Arc::new(InMemoryCatalogStore::default());
  let workflow = workflow_over(&store);

  let mut staging = ImageStaging::new();
  staging.stage(png("front.png"), "front").unwrap();
  let created = workflow
    .submit(SubmissionMode::Create, &widget_input(), &staging)
    .await
    .unwrap();
  let created = created.saved().unwrap().clone();
  assert_eq!(created.image, "memory://images/front");
  assert!(store.has_image("memory://images/front"));

  let stored = store.get(&format!("products/{}", created.id)).unwrap();
  assert_eq!(stored, created);

  let edited = created.to_input().with(catalog_flow::ProductField::StockAmount, "3");
  let updated = workflow
    .submit(SubmissionMode::Update(created.clone()), &edited, &ImageStaging::new())
    .await
    .unwrap();
  assert!(updated.is_saved());

  let listed = store.list("products").unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].fields.stock_amount, "3");
  assert_eq!(listed[0].image, "memory://images/front");
  assert_eq!(listed[0].date_created, created.date_created);
  assert_eq!(store.calls(StoreOperation::Create), 1);
  assert_eq!(store.calls(StoreOperation::Update), 1);
}

#[tokio::test]
#[serial]
async fn scripted_failures_are_consumed_in_order() {
  setup_tracing();
  let store = Arc::new(InMemoryCatalogStore::default());
  store.fail_next(StoreOperation::UploadImage, GatewayError::Unavailable("first".into()));
  let workflow = workflow_over(&store);
  let modal = ProductModal::create(workflow);
  modal.open();
  for field in catalog_flow::ProductField::ALL {
    modal.set_field(field, widget_input().get(field));
  }
  modal.stage_image(png("a.png"), "a").unwrap();

  let first = modal.submit().await.unwrap();
  assert_eq!(first, SubmissionOutcome::UploadFailed(GatewayError::Unavailable("first".into())));
  assert_eq!(store.calls(StoreOperation::Create), 0);
  assert!(store.list("products").unwrap().is_empty());

  let second = modal.submit().await.unwrap();
  assert!(second.is_saved());
  assert_eq!(store.calls(StoreOperation::UploadImage), 2);
  assert_eq!(store.list("products").unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn updating_a_missing_record_is_a_persist_failure() {
  setup_tracing();
  let store = Arc::new(InMemoryCatalogStore::default());
  let workflow = workflow_over(&store);

  let outcome = workflow
    .submit(SubmissionMode::Update(existing_product()), &widget_input(), &ImageStaging::new())
    .await
    .unwrap();

  assert_eq!(
    outcome,
    SubmissionOutcome::PersistFailed(GatewayError::NotFound {
      path: "products/p1".into()
    })
  );
}

#[tokio::test]
#[serial]
async fn legacy_rows_without_image_can_be_edited() {
  setup_tracing();
  let store = Arc::new(InMemoryCatalogStore::default());
  store.seed_document(
    "products/legacy",
    serde_json::json!({
      "productName": "Old", "category": "tools", "price": "1", "cost": "1",
      "stockAmount": "1", "options": "one", "dateCreated": 5, "lastModified": 6, "image": false
    }),
  );
  let legacy = store.get("products/legacy").unwrap();
  assert!(!legacy.has_image());

  let workflow = workflow_over(&store);
  let outcome = workflow
    .submit(SubmissionMode::Update(legacy.clone()), &legacy.to_input(), &ImageStaging::new())
    .await
    .unwrap();
  assert!(outcome.is_saved());

  let reread = store.get("products/legacy").unwrap();
  assert_eq!(reread.image, "");
  assert_eq!(reread.date_created, 5);
  assert_eq!(reread.last_modified, NOW);
}

#[tokio::test]
#[serial]
async fn failed_writes_are_counted_as_calls() {
  setup_tracing();
  let store = InMemoryCatalogStore::default();
  store.fail_next(StoreOperation::Create, GatewayError::Rejected("quota".into()));
  let record = NewProduct {
    fields: widget_record(),
    date_created: NOW,
    last_modified: NOW,
    image: String::new(),
  };

  assert!(store.create("products", &record).await.is_err());
  assert_eq!(store.calls(StoreOperation::Create), 1);
  assert!(store.list("products").unwrap().is_empty());

  let update = ProductUpdate {
    fields: widget_record(),
    last_modified: NOW,
    image: String::new(),
  };
  assert!(matches!(
    store.update("products/gone", &update).await,
    Err(GatewayError::NotFound { .. })
  ));
  assert_eq!(store.calls(StoreOperation::Update), 1);

  store.create("products", &record).await.unwrap();
  assert_eq!(store.calls(StoreOperation::Create), 2);
}
