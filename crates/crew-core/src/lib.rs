//! Core abstractions for crew-rs
//!
//! This crate defines the fundamental types used throughout the workspace:
//! who takes part in a pipeline ([`AgentProfile`]), what they are asked to do
//! ([`TaskSpec`]), what comes back ([`ExecutionResult`], [`RunOutcome`]) and the
//! capability that actually does the work ([`TaskEngine`]).

pub mod agent;
pub mod engine;
pub mod error;
pub mod memory;
pub mod result;
pub mod task;

pub use agent::{AgentProfile, AgentProfileBuilder};
pub use engine::{TaskEngine, TaskInput};
pub use error::{Error, Result};
pub use memory::{MemoryEntry, RunMemory};
pub use result::{CrewOutput, ExecutionResult, RunFailure, RunOutcome};
pub use task::TaskSpec;
