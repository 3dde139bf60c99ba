//! Report persistence
//!
//! A successful run is written as a timestamped markdown report, a failed one
//! as a short plain-text error log. Both land in the writer's output
//! directory and are never overwritten.

use crate::{Crew, Result, WorkflowError};
use chrono::{DateTime, Local};
use crew_core::ExecutionResult;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::{debug, info};

/// Default filename prefix for success reports
pub const DEFAULT_PREFIX: &str = "market_analysis";

/// Default number of characters shown by [`preview`]
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

const FILENAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S";
const REPORT_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
const ERROR_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Descriptive data printed in a report's metadata section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    /// Report heading
    pub title: String,
    /// Agent roles that took part
    pub agents: Vec<String>,
    /// Task names that completed
    pub tasks: Vec<String>,
    /// Kind of analysis
    pub analysis_type: String,
}

impl ReportMetadata {
    /// Derive metadata from a crew's agents and tasks
    pub fn from_crew(crew: &Crew) -> Self {
        Self {
            title: crew.title().to_string(),
            agents: crew
                .agents()
                .iter()
                .map(|agent| agent.role().to_string())
                .collect(),
            tasks: crew.tasks().iter().map(|t| t.name().to_string()).collect(),
            analysis_type: crew.analysis_type().to_string(),
        }
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            title: "Market Analysis Report".to_string(),
            agents: Vec::new(),
            tasks: Vec::new(),
            analysis_type: String::new(),
        }
    }
}

/// Writes run outcomes to disk
///
/// # Example
///
/// ```no_run
/// use crew_workflow::ResultWriter;
/// use crew_core::ExecutionResult;
///
/// let writer = ResultWriter::new("reports").with_prefix("weekly");
/// let result = ExecutionResult::new("analysis", "Analyst", "All good");
/// let path = writer.write_success(&result)?;
/// println!("saved to {}", path.display());
/// # Ok::<(), crew_workflow::WorkflowError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ResultWriter {
    output_dir: PathBuf,
    prefix: String,
    metadata: ReportMetadata,
}

impl ResultWriter {
    /// Create a writer targeting `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            metadata: ReportMetadata::default(),
        }
    }

    /// Set the filename prefix for success reports
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the metadata printed in reports
    pub fn with_metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Write a success report stamped with the current local time
    pub fn write_success(&self, result: &ExecutionResult) -> Result<PathBuf> {
        self.write_success_at(result, Local::now())
    }

    /// Write a success report stamped with `timestamp`
    pub fn write_success_at(
        &self,
        result: &ExecutionResult,
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf> {
        let filename = format!(
            "{}_{}.md",
            self.prefix,
            timestamp.format(FILENAME_TIMESTAMP)
        );
        let content = self.render_report(result, timestamp);
        let path = self.create(&filename, &content)?;
        info!("Report written to {}", path.display());
        Ok(path)
    }

    /// Write an error log for a failed run
    pub fn write_failure(&self, error: &str, timestamp: DateTime<Local>) -> Result<PathBuf> {
        let filename = format!("error_log_{}.txt", timestamp.format(FILENAME_TIMESTAMP));
        let content = format!(
            "{} Error\nTimestamp: {}\nError: {}\n",
            self.metadata.title,
            timestamp.format(ERROR_TIMESTAMP),
            error
        );
        let path = self.create(&filename, &content)?;
        info!("Error log written to {}", path.display());
        Ok(path)
    }

    fn render_report(&self, result: &ExecutionResult, timestamp: DateTime<Local>) -> String {
        let meta = &self.metadata;
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "# {}\n\n**Generated on:** {}\n\n---\n\n## Analysis Results\n\n{}\n\n---\n\n",
            meta.title,
            timestamp.format(REPORT_TIMESTAMP),
            result
        );
        let _ = write!(
            out,
            "## Report Metadata\n\n- **Agents Used:** {}\n- **Tasks Completed:** {}\n- **Analysis Type:** {}\n",
            meta.agents.join(", "),
            meta.tasks.join(", "),
            meta.analysis_type
        );
        out.push_str("\n---\n\n*End of Report*\n");
        out
    }

    fn create(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        debug!("Creating {}", path.display());

        let persistence = |source| WorkflowError::Persistence {
            path: path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(persistence)?;
        file.write_all(content.as_bytes()).map_err(persistence)?;

        Ok(path)
    }
}

/// First `limit` characters of `text`, with `...` appended when truncated
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
