//! End-to-end runs of the market analysis pipeline with a scripted engine

use async_trait::async_trait;
use crew_core::{ExecutionResult, RunMemory, TaskEngine, TaskInput};
use crew_workflow::{Crew, PipelineRunner, ReportMetadata, ResultWriter};
use market_analysis::definition::{ANALYSIS_TASK, RESEARCH_TASK};
use market_analysis::{AnalysisOutcome, market_analysis, run_analysis};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Engine that answers each stage from a script and records the context it got
struct ScriptedEngine {
    research: Result<&'static str, &'static str>,
    analysis: &'static str,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedEngine {
    fn new(research: Result<&'static str, &'static str>, analysis: &'static str) -> Self {
        Self {
            research,
            analysis,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskEngine for ScriptedEngine {
    async fn execute(
        &self,
        input: TaskInput<'_>,
        memory: &mut RunMemory,
    ) -> crew_core::Result<ExecutionResult> {
        let task = input.task.name();
        self.calls
            .lock()
            .unwrap()
            .push((task.to_string(), input.context.to_string()));

        let raw = match task {
            RESEARCH_TASK => self
                .research
                .map_err(|message| crew_core::Error::engine(task, message))?,
            _ => self.analysis,
        };
        memory.record(task, input.task.agent().role(), raw);
        Ok(ExecutionResult::new(task, input.task.agent().role(), raw))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn setup(dir: &Path, engine: Arc<ScriptedEngine>) -> (PipelineRunner, Crew, ResultWriter) {
    let crew = Crew::from_definition(market_analysis()).unwrap();
    let writer = ResultWriter::new(dir).with_metadata(ReportMetadata::from_crew(&crew));
    (PipelineRunner::new(engine), crew, writer)
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

fn without_timestamp(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with("**Generated on:**"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_successful_run_writes_report() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(ScriptedEngine::new(Ok("R1"), "## Top 3\n1. Diagnostics"));
    let (runner, crew, writer) = setup(dir.path(), engine.clone());

    let outcome = run_analysis(&runner, &crew, &writer).await.unwrap();

    let AnalysisOutcome::Completed { report, output } = outcome else {
        panic!("expected a completed run");
    };
    assert!(
        Regex::new(r"^market_analysis_\d{8}_\d{6}\.md$")
            .unwrap()
            .is_match(&file_name(&report))
    );
    assert_eq!(output.tasks_output.len(), 2);

    let calls = engine.calls();
    assert_eq!(calls[0], (RESEARCH_TASK.to_string(), String::new()));
    assert_eq!(calls[1].0, ANALYSIS_TASK);
    assert!(calls[1].1.contains("R1"));

    let content = std::fs::read_to_string(&report).unwrap();
    let section = format!("## Analysis Results\n\n{}\n\n---\n\n", output.raw);
    assert!(content.contains(&section));
    assert!(content.contains("- **Agents Used:** Market Research Specialist, Market Analyst"));
    assert!(content.contains("- **Tasks Completed:** Market Research, Investment Analysis"));
}

#[tokio::test]
async fn test_research_failure_writes_error_log() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(ScriptedEngine::new(Err("network timeout"), "unused"));
    let (runner, crew, writer) = setup(dir.path(), engine.clone());

    let outcome = run_analysis(&runner, &crew, &writer).await.unwrap();

    let AnalysisOutcome::Failed { error_log, error } = outcome else {
        panic!("expected a failed run");
    };
    assert!(error.starts_with("Error during analysis: "));
    assert!(
        Regex::new(r"^error_log_\d{8}_\d{6}\.txt$")
            .unwrap()
            .is_match(&file_name(&error_log))
    );
    let content = std::fs::read_to_string(&error_log).unwrap();
    assert!(content.contains("network timeout"));

    let stages: Vec<_> = engine.calls().into_iter().map(|(task, _)| task).collect();
    assert_eq!(stages, [RESEARCH_TASK]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1, "only the error log");
}

#[tokio::test]
async fn test_runs_are_reproducible() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let mut reports = Vec::new();

    for dir in [&first_dir, &second_dir] {
        let engine = Arc::new(ScriptedEngine::new(Ok("R1"), "Final analysis"));
        let (runner, crew, writer) = setup(dir.path(), engine);
        match run_analysis(&runner, &crew, &writer).await.unwrap() {
            AnalysisOutcome::Completed { report, .. } => {
                reports.push(std::fs::read_to_string(report).unwrap());
            }
            AnalysisOutcome::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    assert_eq!(without_timestamp(&reports[0]), without_timestamp(&reports[1]));
}

#[tokio::test]
async fn test_unwritable_output_is_an_error() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(ScriptedEngine::new(Ok("R1"), "R2"));
    let (runner, crew, writer) = setup(&dir.path().join("missing"), engine);

    assert!(run_analysis(&runner, &crew, &writer).await.is_err());
}
