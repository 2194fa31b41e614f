use catalog_flow::{
  CategoryList, ImageFile, ImageStaging, InMemoryCatalogStore, ProductField, ProductInput, ProductPaths,
  ProductValidator, SubmissionMode, SubmissionWorkflow, ValidationPolicy,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn widget_input() -> ProductInput {
  ProductInput::default()
    .with(ProductField::ProductName, "Widget")
    .with(ProductField::Category, "tools")
    .with(ProductField::Price, "10")
    .with(ProductField::Cost, "5")
    .with(ProductField::StockAmount, "100")
    .with(ProductField::Options, "red,blue")
}

fn bench_validation(c: &mut Criterion) {
  let mut group = c.benchmark_group("Validation");
  let categories = CategoryList::parse("tools:Tools,food:Food,apparel:Apparel").unwrap();
  let strict = ProductValidator::new(
    ValidationPolicy {
      enforce_category_membership: true,
      ..Default::default()
    },
    categories,
  );
  let lenient = ProductValidator::default();
  let invalid = ProductInput::default().with(ProductField::Price, "abc");

  group.bench_function("is_submittable/valid", |b| b.iter(|| lenient.is_submittable(&widget_input())));
  group.bench_function("validate/strict_categories", |b| b.iter(|| strict.validate(&widget_input())));
  group.bench_function("validate/all_fields_invalid", |b| b.iter(|| lenient.validate(&invalid)));
  group.finish();
}

fn bench_submission(c: &mut Criterion) {
  let mut group = c.benchmark_group("Submission");
  let rt = Runtime::new().unwrap();
  let store = Arc::new(InMemoryCatalogStore::default());
  let workflow = SubmissionWorkflow::new(
    store.clone(),
    store.clone(),
    ProductPaths::default(),
    ProductValidator::default(),
  );
  let input = widget_input();

  for with_image in [false, true] {
    let mut staging = ImageStaging::new();
    if with_image {
      staging
        .stage(ImageFile::new("w.png", "image/png", vec![0u8; 4096]), "w")
        .unwrap();
    }
    group.bench_with_input(BenchmarkId::new("create", with_image), &staging, |b, staging| {
      b.to_async(&rt)
        .iter(|| async { workflow.submit(SubmissionMode::Create, &input, staging).await.unwrap() })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_validation, bench_submission);
criterion_main!(benches);
