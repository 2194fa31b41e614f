// catalog_flow/src/pipeline/mod.rs

//! Named-step async pipeline used to drive the submission workflow.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
