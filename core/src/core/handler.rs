// catalog_flow/src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by a step handler.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>;

/// A pipeline step handler.
///
/// Receives its own clone of the run's `ContextData<TData>` and resolves to either a
/// `StepControl` or the pipeline's error type. Handlers must release any lock guard
/// before awaiting.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;
