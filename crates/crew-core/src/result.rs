//! Execution results and run outcomes

use crate::RunMemory;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Output of running one task
///
/// `raw` is the text the engine produced. When that text is a JSON object or
/// array it is also kept in parsed form in `json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Name of the task that produced this result
    pub task: String,
    /// Role of the agent that produced this result
    pub agent: String,
    /// Literal output text
    pub raw: String,
    /// Structured form of `raw`, if it parses as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
}

impl ExecutionResult {
    /// Wrap engine output, detecting structured JSON payloads
    pub fn new(task: impl Into<String>, agent: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let json = parse_structured(&raw);
        Self {
            task: task.into(),
            agent: agent.into(),
            raw,
            json,
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_structured(raw: &str) -> Option<serde_json::Value> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Combined result of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Identifier of the run that produced this output
    pub run_id: Uuid,
    /// Result of the final task
    pub raw: ExecutionResult,
    /// Results of every task, in execution order
    pub tasks_output: Vec<ExecutionResult>,
    /// The run's memory as it stood after the final task
    pub memory: RunMemory,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

/// Failure record for an aborted run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    /// Error description
    pub error: String,
    /// Task that was running when the failure happened
    pub task: Option<String>,
    /// When the failure was recorded
    pub timestamp: DateTime<Local>,
}

/// Terminal result of one pipeline execution
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every task completed
    Success(CrewOutput),
    /// A task failed; nothing after it ran
    Failure(RunFailure),
}

impl RunOutcome {
    /// Check if the run completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Final output, if the run completed
    pub fn output(&self) -> Option<&CrewOutput> {
        match self {
            Self::Success(output) => Some(output),
            Self::Failure(_) => None,
        }
    }

    /// Failure record, if the run failed
    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
