// catalog_flow/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, which drives the declared steps in order.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineOutcome, StepControl};
use crate::core::handler::Handler;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes the pipeline against `ctx_data`.
  ///
  /// Steps run strictly one after another; a handler's future is awaited to completion
  /// before the next handler starts. The first handler error aborts the run and is
  /// returned unchanged. A step that is not skipped but has no handlers yields
  /// `PipelineError::HandlerMissing` converted into `Err`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineOutcome, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if step_def.should_skip(&ctx_data) {
        event!(Level::DEBUG, step_name, "Step skipped by its skip condition.");
        continue;
      }

      let on_handlers = non_empty(self.on.get(step_name));
      let after_handlers = non_empty(self.after.get(step_name));
      if on_handlers.is_none() && after_handlers.is_none() {
        event!(Level::ERROR, step_name, "Step has no handlers.");
        return Err(Err::from(PipelineError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = tracing::info_span!("pipeline_step", step_name, step_index = step_idx);
      for (phase, handlers) in [("on", on_handlers), ("after", after_handlers)] {
        let Some(handlers) = handlers else { continue };
        match run_phase(handlers, &ctx_data, phase).instrument(step_span.clone()).await? {
          StepControl::Continue => {}
          StepControl::Halt => {
            event!(Level::INFO, step_name, phase, "Pipeline halted by a handler.");
            return Ok(PipelineOutcome::Halted {
              step: step_def.name.clone(),
            });
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineOutcome::Completed)
  }
}

fn non_empty<H>(handlers: Option<&Vec<H>>) -> Option<&[H]> {
  handlers.filter(|v| !v.is_empty()).map(Vec::as_slice)
}

async fn run_phase<TData, Err>(
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
  phase: &'static str,
) -> Result<StepControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(StepControl::Continue) => {}
      Ok(StepControl::Halt) => return Ok(StepControl::Halt),
      Err(e) => {
        event!(Level::WARN, phase, handler_index = handler_idx, error = %e, "Step handler failed.");
        return Err(e);
      }
    }
  }
  Ok(StepControl::Continue)
}
