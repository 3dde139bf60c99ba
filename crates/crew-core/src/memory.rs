//! Run-scoped memory
//!
//! `RunMemory` is the store an engine may use to keep state across the tasks
//! of one pipeline run, beyond what explicit predecessor wiring provides. The
//! runner creates a fresh store per run and passes it by `&mut` into every
//! engine call; it is dropped when the run ends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// A task output remembered during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Task that produced the output
    pub task: String,
    /// Agent role that produced the output
    pub agent: String,
    /// Output text
    pub content: String,
}

/// Memory owned by a single pipeline run
///
/// # Example
///
/// ```
/// use crew_core::RunMemory;
///
/// let mut memory = RunMemory::new();
/// memory.record("research", "Researcher", "Market is growing");
/// assert_eq!(memory.entries().len(), 1);
/// assert!(memory.is_enabled());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMemory {
    run_id: Uuid,
    enabled: bool,
    entries: Vec<MemoryEntry>,
    data: HashMap<String, serde_json::Value>,
}

impl RunMemory {
    /// Create an enabled memory for a new run
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            enabled: true,
            entries: Vec::new(),
            data: HashMap::new(),
        }
    }

    /// Create a memory that engines should not consult
    ///
    /// The run id is still allocated so results can be correlated.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Identifier of the owning run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Whether engines may use this memory
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Remember a task's output
    pub fn record(
        &mut self,
        task: impl Into<String>,
        agent: impl Into<String>,
        content: impl Into<String>,
    ) {
        let entry = MemoryEntry {
            task: task.into(),
            agent: agent.into(),
            content: content.into(),
        };
        debug!(run_id = %self.run_id, task = %entry.task, "Recorded task output in run memory");
        self.entries.push(entry);
    }

    /// Remembered outputs, oldest first
    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Insert a typed value, serializing it to JSON
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize memory value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value, deserializing it from JSON
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize memory value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }
}

impl Default for RunMemory {
    fn default() -> Self {
        Self::new()
    }
}
