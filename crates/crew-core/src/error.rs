//! Error types for crew-core

use thiserror::Error;

/// Result type alias for crew-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent and task operations
#[derive(Error, Debug)]
pub enum Error {
    /// Engine or agent initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Processing failed outside of a specific task
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// The execution engine failed while running a task
    #[error("Task '{task}' failed: {message}")]
    Engine {
        /// Name of the task that was running
        task: String,
        /// Underlying failure description
        message: String,
    },
}

impl Error {
    /// Build an engine failure for the named task
    pub fn engine(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            task: task.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::engine("Market Research", "network timeout");
        assert_eq!(err.to_string(), "Task 'Market Research' failed: network timeout");

        let err = Error::ProcessingFailed("bad memory value".to_string());
        assert_eq!(err.to_string(), "Processing failed: bad memory value");
    }
}
