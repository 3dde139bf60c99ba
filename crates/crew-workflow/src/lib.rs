//! Sequential multi-agent pipelines for crew-rs
//!
//! This crate turns a [`PipelineDefinition`] into a validated [`Crew`], runs it
//! task by task with [`PipelineRunner`], and persists the outcome with
//! [`ResultWriter`].

pub mod crew;
pub mod error;
pub mod report;
pub mod runner;

// Re-export for convenience
pub use crew::{Crew, PipelineDefinition, Process};
pub use error::{Result, WorkflowError};
pub use report::{ReportMetadata, ResultWriter, preview};
pub use runner::{NoOpObserver, PipelineRunner, RunObserver};
