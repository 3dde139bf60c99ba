//! Task specifications

use crate::AgentProfile;
use std::sync::Arc;

/// One unit of work in a pipeline
///
/// A task is owned by exactly one agent and may name earlier tasks whose
/// outputs it needs as context. The names are resolved when the pipeline is
/// validated, not here.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    name: String,
    description: String,
    expected_output: String,
    agent: Arc<AgentProfile>,
    context: Vec<String>,
}

impl TaskSpec {
    /// Create a task with no predecessors
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<AgentProfile>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            context: Vec::new(),
        }
    }

    /// Declare a predecessor whose output is fed in as context
    ///
    /// Predecessors are consumed in the order they are declared.
    pub fn with_context(mut self, predecessor: &TaskSpec) -> Self {
        self.context.push(predecessor.name.clone());
        self
    }

    /// Declare a predecessor by name
    pub fn with_context_name(mut self, predecessor: impl Into<String>) -> Self {
        self.context.push(predecessor.into());
        self
    }

    /// Task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instructions for the agent
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Contract describing the shape of the required result
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// The agent this task is assigned to
    pub fn agent(&self) -> &Arc<AgentProfile> {
        &self.agent
    }

    /// Names of predecessor tasks, in declared order
    pub fn context(&self) -> &[String] {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Arc<AgentProfile> {
        Arc::new(AgentProfile::builder("Researcher").build())
    }

    #[test]
    fn test_new_task_has_no_context() {
        let task = TaskSpec::new("research", "Do research", "A report", agent());
        assert_eq!(task.name(), "research");
        assert_eq!(task.description(), "Do research");
        assert_eq!(task.expected_output(), "A report");
        assert!(task.context().is_empty());
    }

    #[test]
    fn test_context_keeps_declared_order() {
        let a = TaskSpec::new("a", "", "", agent());
        let b = TaskSpec::new("b", "", "", agent());
        let c = TaskSpec::new("c", "", "", agent())
            .with_context(&b)
            .with_context(&a);

        assert_eq!(c.context(), ["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_shared_agent() {
        let shared = agent();
        let a = TaskSpec::new("a", "", "", shared.clone());
        let b = TaskSpec::new("b", "", "", shared.clone());
        assert!(Arc::ptr_eq(a.agent(), b.agent()));
    }
}
