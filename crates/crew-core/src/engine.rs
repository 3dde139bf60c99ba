//! The execution engine capability

use crate::{ExecutionResult, Result, RunMemory, TaskSpec};
use async_trait::async_trait;

/// Everything an engine needs to run one task
#[derive(Debug, Clone, Copy)]
pub struct TaskInput<'a> {
    /// The task to run, including its assigned agent
    pub task: &'a TaskSpec,
    /// Concatenated predecessor outputs, empty when the task has none
    pub context: &'a str,
}

impl<'a> TaskInput<'a> {
    /// Create a new task input
    pub fn new(task: &'a TaskSpec, context: &'a str) -> Self {
        Self { task, context }
    }

    /// Whether predecessor context is available
    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }
}

/// Capability that performs an agent's reasoning for a task
///
/// Implementations decide how to use the agent profile, the context and the
/// run memory. A call blocks the pipeline until it returns; any retrying or
/// streaming happens inside the implementation.
#[async_trait]
pub trait TaskEngine: Send + Sync {
    /// Run a task and return its output
    async fn execute(&self, input: TaskInput<'_>, memory: &mut RunMemory)
    -> Result<ExecutionResult>;

    /// Get the engine's name
    fn name(&self) -> &str;
}
