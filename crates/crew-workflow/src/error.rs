//! Error types for crew-workflow

use thiserror::Error;

/// Result type alias for crew-workflow
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors raised while validating or persisting a pipeline
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The pipeline definition breaks an ordering or naming rule
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    /// A report or error log could not be written
    #[error("Failed to write {path}: {source}")]
    Persistence {
        /// File that was being written
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}
