// catalog_flow/src/workflow/clock.rs

use crate::product::EpochMillis;

/// Source of the submission timestamp.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> EpochMillis;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
  }
}

impl<F> Clock for F
where
  F: Fn() -> EpochMillis + Send + Sync,
{
  fn now_millis(&self) -> EpochMillis {
    self()
  }
}
