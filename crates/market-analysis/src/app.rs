//! Running the pipeline and persisting its outcome

use crew_core::{CrewOutput, RunOutcome};
use crew_llm::TokenUsage;
use crew_runtime::USAGE_KEY;
use crew_workflow::{Crew, PipelineRunner, ResultWriter};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// What a run left on disk
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// Every stage completed and the report was written
    Completed {
        /// Path of the markdown report
        report: PathBuf,
        /// Output of the run
        output: CrewOutput,
    },
    /// A stage failed and the error log was written
    Failed {
        /// Path of the error log
        error_log: PathBuf,
        /// Message written to the log
        error: String,
    },
}

impl AnalysisOutcome {
    /// Check if the run completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Run `crew` and write either its report or an error log
///
/// A failing stage is not an error here: it produces
/// [`AnalysisOutcome::Failed`]. Only a file that cannot be written is.
pub async fn run_analysis(
    runner: &PipelineRunner,
    crew: &Crew,
    writer: &ResultWriter,
) -> crew_workflow::Result<AnalysisOutcome> {
    match runner.run(crew).await {
        RunOutcome::Success(output) => {
            info!(run_id = %output.run_id, "Analysis completed, saving report");
            let report = writer.write_success(&output.raw)?;
            Ok(AnalysisOutcome::Completed { report, output })
        }
        RunOutcome::Failure(failure) => {
            let error = format!("Error during analysis: {}", failure.error);
            error!("{}", error);
            let error_log = writer.write_failure(&error, failure.timestamp)?;
            Ok(AnalysisOutcome::Failed { error_log, error })
        }
    }
}

/// Tokens the engine recorded across every task of a run
///
/// `None` when the engine recorded no usage.
pub fn token_usage(output: &CrewOutput) -> Option<TokenUsage> {
    match output.memory.get_typed(USAGE_KEY) {
        Ok(usage) => usage,
        Err(e) => {
            warn!("Ignoring unreadable token usage: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::{ExecutionResult, RunMemory};

    fn output(memory: RunMemory) -> CrewOutput {
        let result = ExecutionResult::new("analysis", "Analyst", "Top picks");
        CrewOutput {
            run_id: memory.run_id(),
            raw: result.clone(),
            tasks_output: vec![result],
            memory,
        }
    }

    #[test]
    fn test_token_usage_read_from_memory() {
        let mut memory = RunMemory::new();
        let usage = TokenUsage {
            prompt_tokens: 120,
            completion_tokens: 80,
        };
        memory.insert_typed(USAGE_KEY, &usage).unwrap();

        let read = token_usage(&output(memory)).unwrap();
        assert_eq!(read, usage);
        assert_eq!(read.total(), 200);
    }

    #[test]
    fn test_token_usage_absent() {
        assert!(token_usage(&output(RunMemory::new())).is_none());
        assert!(token_usage(&output(RunMemory::disabled())).is_none());
    }

    #[test]
    fn test_token_usage_of_wrong_shape_is_ignored() {
        let mut memory = RunMemory::new();
        memory.insert_typed(USAGE_KEY, &"not usage").unwrap();
        assert!(token_usage(&output(memory)).is_none());
    }
}
