// catalog_flow/src/core/control.rs

//! Signals for controlling pipeline flow and the outcome of a pipeline run.

/// Verdict returned by a step handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Keep going: remaining handlers of this step, then the next step.
  Continue,
  /// Stop the run cleanly. No further handlers or steps are executed.
  Halt,
}

/// Outcome of a full pipeline execution that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
  /// Every non-skipped step ran to completion.
  Completed,
  /// A handler returned `StepControl::Halt` while running `step`.
  Halted { step: String },
}

impl PipelineOutcome {
  pub fn is_completed(&self) -> bool {
    matches!(self, PipelineOutcome::Completed)
  }
}
