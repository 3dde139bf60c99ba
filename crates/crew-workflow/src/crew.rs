//! Pipeline definitions and validated crews

use crate::{Result, WorkflowError};
use crew_core::{AgentProfile, TaskSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// How tasks are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// One task at a time, in declaration order
    #[default]
    Sequential,
}

/// Declarative description of a pipeline
///
/// Assembling a definition cannot fail; the ordering rules are checked when
/// it is turned into a [`Crew`].
#[derive(Debug, Clone)]
pub struct PipelineDefinition {
    /// Tasks in execution order
    pub tasks: Vec<TaskSpec>,
    /// Scheduling policy
    pub process: Process,
    /// Whether the run keeps a memory store engines may consult
    pub memory: bool,
    /// Whether run-level progress is reported at `info` level
    pub verbose: bool,
    /// Report title
    pub title: String,
    /// Kind of analysis, shown in report metadata
    pub analysis_type: String,
}

impl PipelineDefinition {
    /// Create a sequential definition with memory enabled
    pub fn new(title: impl Into<String>, analysis_type: impl Into<String>) -> Self {
        Self {
            tasks: Vec::new(),
            process: Process::Sequential,
            memory: true,
            verbose: false,
            title: title.into(),
            analysis_type: analysis_type.into(),
        }
    }

    /// Append a task
    pub fn task(mut self, task: TaskSpec) -> Self {
        self.tasks.push(task);
        self
    }

    /// Enable or disable run memory
    pub fn memory(mut self, enabled: bool) -> Self {
        self.memory = enabled;
        self
    }

    /// Set run-level verbosity
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// A pipeline whose task graph has been checked
///
/// Every predecessor a task names appears earlier in the task list, so the
/// graph is acyclic and the list order is a valid execution order.
#[derive(Debug, Clone)]
pub struct Crew {
    definition: PipelineDefinition,
}

impl Crew {
    /// Validate a definition
    ///
    /// Rejects empty pipelines, duplicate task names, and predecessors that
    /// are unknown, the task itself, or declared later in the list.
    pub fn from_definition(definition: PipelineDefinition) -> Result<Self> {
        if definition.tasks.is_empty() {
            return Err(WorkflowError::InvalidPipeline(
                "pipeline has no tasks".to_string(),
            ));
        }

        let all: HashSet<&str> = definition.tasks.iter().map(TaskSpec::name).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        for task in &definition.tasks {
            for predecessor in task.context() {
                if !seen.contains(predecessor.as_str()) {
                    let reason = if predecessor == task.name() {
                        "itself"
                    } else if all.contains(predecessor.as_str()) {
                        "a task that runs later"
                    } else {
                        "an unknown task"
                    };
                    return Err(WorkflowError::InvalidPipeline(format!(
                        "task '{}' takes context from {reason} ('{predecessor}')",
                        task.name()
                    )));
                }
            }
            if !seen.insert(task.name()) {
                return Err(WorkflowError::InvalidPipeline(format!(
                    "duplicate task name '{}'",
                    task.name()
                )));
            }
        }

        Ok(Self { definition })
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.definition.tasks
    }

    /// Distinct agents, in order of first appearance
    ///
    /// Agents are the same when tasks share one profile; two profiles with
    /// the same role are still listed separately.
    pub fn agents(&self) -> Vec<Arc<AgentProfile>> {
        let mut agents: Vec<Arc<AgentProfile>> = Vec::new();
        for task in &self.definition.tasks {
            if !agents.iter().any(|a| Arc::ptr_eq(a, task.agent())) {
                agents.push(task.agent().clone());
            }
        }
        agents
    }

    /// Scheduling policy
    pub fn process(&self) -> Process {
        self.definition.process
    }

    /// Whether the run keeps a memory store
    pub fn memory(&self) -> bool {
        self.definition.memory
    }

    /// Whether run-level progress is reported at `info` level
    pub fn verbose(&self) -> bool {
        self.definition.verbose
    }

    /// Report title
    pub fn title(&self) -> &str {
        &self.definition.title
    }

    /// Kind of analysis
    pub fn analysis_type(&self) -> &str {
        &self.definition.analysis_type
    }
}
