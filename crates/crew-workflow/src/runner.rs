//! Sequential pipeline execution
//!
//! The runner executes a [`Crew`]'s tasks strictly in order. Each task's
//! context is the concatenation of its predecessors' outputs, in the order the
//! task declared them. The first failing task ends the run: later tasks are
//! not attempted and the outputs gathered so far are discarded.

use crate::Crew;
use crate::report::preview;
use chrono::Local;
use crew_core::{
    CrewOutput, ExecutionResult, RunFailure, RunMemory, RunOutcome, TaskEngine, TaskInput,
    TaskSpec,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Separator placed between predecessor outputs in a task's context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Characters of each task output shown in verbose progress logs
const LOG_PREVIEW_CHARS: usize = 200;

/// Receives progress callbacks during a run
///
/// Implement this trait to report progress to a user; the runner itself only
/// emits tracing events.
#[cfg_attr(test, mockall::automock)]
pub trait RunObserver: Send + Sync {
    /// Called once before the first task starts
    fn on_run_start(&self, _total: usize) {}

    /// Called before a task is handed to the engine
    fn on_task_start(&self, _index: usize, _total: usize, _task: &TaskSpec) {}

    /// Called after a task produced its output
    fn on_task_complete(&self, _index: usize, _total: usize, _result: &ExecutionResult) {}

    /// Called when a task failed; no further callbacks follow
    fn on_task_failed(&self, _index: usize, _total: usize, _task: &TaskSpec, _error: &str) {}
}

/// Observer that ignores every callback
pub struct NoOpObserver;

impl RunObserver for NoOpObserver {}

/// Runs a crew's tasks one after another through a [`TaskEngine`]
///
/// # Example
///
/// ```no_run
/// use crew_workflow::{Crew, PipelineRunner};
/// use crew_core::{RunOutcome, TaskEngine};
/// use std::sync::Arc;
///
/// # async fn example(engine: Arc<dyn TaskEngine>, crew: Crew) {
/// let runner = PipelineRunner::new(engine);
/// match runner.run(&crew).await {
///     RunOutcome::Success(output) => println!("{output}"),
///     RunOutcome::Failure(failure) => eprintln!("{}", failure.error),
/// }
/// # }
/// ```
pub struct PipelineRunner {
    engine: Arc<dyn TaskEngine>,
    observer: Arc<dyn RunObserver>,
}

impl PipelineRunner {
    /// Create a runner with no observer
    pub fn new(engine: Arc<dyn TaskEngine>) -> Self {
        Self {
            engine,
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Execute every task in order and return the terminal outcome
    pub async fn run(&self, crew: &Crew) -> RunOutcome {
        let mut memory = if crew.memory() {
            RunMemory::new()
        } else {
            RunMemory::disabled()
        };
        let run_id = memory.run_id();
        let tasks = crew.tasks();
        let total = tasks.len();

        info!(
            %run_id,
            tasks = total,
            process = ?crew.process(),
            engine = self.engine.name(),
            "Starting pipeline run"
        );
        self.observer.on_run_start(total);

        let mut outputs: Vec<ExecutionResult> = Vec::with_capacity(total);

        for (index, task) in tasks.iter().enumerate() {
            let context = build_context(task, &tasks[..index], &outputs);
            info!(
                "[{}/{}] Running task '{}' with agent '{}'",
                index + 1,
                total,
                task.name(),
                task.agent().role()
            );
            self.observer.on_task_start(index, total, task);

            match self
                .engine
                .execute(TaskInput::new(task, &context), &mut memory)
                .await
            {
                Ok(result) => {
                    if crew.verbose() || task.agent().verbose() {
                        info!(
                            "[{}/{}] '{}' finished: {}",
                            index + 1,
                            total,
                            task.name(),
                            preview(&result.raw, LOG_PREVIEW_CHARS)
                        );
                    } else {
                        debug!("[{}/{}] '{}' finished", index + 1, total, task.name());
                    }
                    self.observer.on_task_complete(index, total, &result);
                    outputs.push(result);
                }
                Err(e) => {
                    let message = e.to_string();
                    error!(
                        %run_id,
                        "[{}/{}] Task '{}' failed, aborting run: {}",
                        index + 1,
                        total,
                        task.name(),
                        message
                    );
                    self.observer.on_task_failed(index, total, task, &message);
                    return RunOutcome::Failure(RunFailure {
                        error: message,
                        task: Some(task.name().to_string()),
                        timestamp: Local::now(),
                    });
                }
            }
        }

        match outputs.last().cloned() {
            Some(raw) => {
                info!(%run_id, "Pipeline run completed");
                RunOutcome::Success(CrewOutput {
                    run_id,
                    raw,
                    tasks_output: outputs,
                    memory,
                })
            }
            None => RunOutcome::Failure(RunFailure {
                error: "pipeline produced no output".to_string(),
                task: None,
                timestamp: Local::now(),
            }),
        }
    }
}

/// Concatenate the outputs of `task`'s predecessors in declared order
///
/// `earlier` and `outputs` are aligned: `outputs[i]` is the result of
/// `earlier[i]`.
fn build_context(task: &TaskSpec, earlier: &[TaskSpec], outputs: &[ExecutionResult]) -> String {
    task.context()
        .iter()
        .filter_map(|name| {
            earlier
                .iter()
                .position(|t| t.name() == name)
                .and_then(|pos| outputs.get(pos))
        })
        .map(|result| result.raw.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineDefinition;
    use async_trait::async_trait;
    use crew_core::AgentProfile;
    use mockall::predicate::always;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Engine that returns canned outputs per task and records what it saw
    #[derive(Default)]
    struct StubEngine {
        outputs: HashMap<String, Result<String, String>>,
        seen: Mutex<Vec<(String, String)>>,
        memory_flags: Mutex<Vec<bool>>,
    }

    impl StubEngine {
        fn with(mut self, task: &str, output: Result<&str, &str>) -> Self {
            self.outputs.insert(
                task.to_string(),
                output.map(str::to_string).map_err(str::to_string),
            );
            self
        }

        fn seen(&self) -> Vec<(String, String)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskEngine for StubEngine {
        async fn execute(
            &self,
            input: TaskInput<'_>,
            memory: &mut RunMemory,
        ) -> crew_core::Result<ExecutionResult> {
            let name = input.task.name().to_string();
            self.seen
                .lock()
                .unwrap()
                .push((name.clone(), input.context.to_string()));
            self.memory_flags.lock().unwrap().push(memory.is_enabled());

            match self.outputs.get(&name) {
                Some(Ok(raw)) => Ok(ExecutionResult::new(&name, input.task.agent().role(), raw)),
                Some(Err(message)) => Err(crew_core::Error::engine(&name, message)),
                None => Err(crew_core::Error::engine(&name, "no stub output")),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn two_stage() -> Crew {
        let researcher = Arc::new(AgentProfile::builder("Researcher").verbose(true).build());
        let analyst = Arc::new(AgentProfile::builder("Analyst").build());
        let research = TaskSpec::new("research", "Research", "Data", researcher);
        let analysis = TaskSpec::new("analysis", "Analyze", "Picks", analyst).with_context(&research);
        Crew::from_definition(
            PipelineDefinition::new("Report", "Test").task(research).task(analysis),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_predecessor_output_becomes_context() {
        let engine = Arc::new(
            StubEngine::default()
                .with("research", Ok("R1"))
                .with("analysis", Ok("R2")),
        );
        let runner = PipelineRunner::new(engine.clone());

        let outcome = runner.run(&two_stage()).await;

        let output = outcome.output().expect("run should succeed");
        assert_eq!(output.raw.raw, "R2");
        assert_eq!(output.tasks_output.len(), 2);
        assert_eq!(output.memory.run_id(), output.run_id);
        assert!(output.memory.is_enabled());
        assert_eq!(
            engine.seen(),
            vec![
                ("research".to_string(), String::new()),
                ("analysis".to_string(), "R1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_context_concatenated_in_declared_order() {
        let agent = Arc::new(AgentProfile::builder("Agent").build());
        let a = TaskSpec::new("a", "", "", agent.clone());
        let b = TaskSpec::new("b", "", "", agent.clone());
        let c = TaskSpec::new("c", "", "", agent).with_context(&b).with_context(&a);
        let crew =
            Crew::from_definition(PipelineDefinition::new("R", "T").task(a).task(b).task(c))
                .unwrap();

        let engine = Arc::new(
            StubEngine::default()
                .with("a", Ok("A-out"))
                .with("b", Ok("B-out"))
                .with("c", Ok("C-out")),
        );
        PipelineRunner::new(engine.clone()).run(&crew).await;

        let seen = engine.seen();
        assert_eq!(seen[1].1, "", "b declares no predecessors");
        assert_eq!(seen[2].1, "B-out\n\nA-out");
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let engine = Arc::new(
            StubEngine::default()
                .with("research", Err("network timeout"))
                .with("analysis", Ok("never")),
        );

        let mut observer = MockRunObserver::new();
        observer.expect_on_run_start().times(1).return_const(());
        observer
            .expect_on_task_start()
            .with(always(), always(), always())
            .times(1)
            .return_const(());
        observer.expect_on_task_complete().never();
        observer
            .expect_on_task_failed()
            .withf(|index, total, task, error| {
                *index == 0 && *total == 2 && task.name() == "research" && error.contains("network timeout")
            })
            .times(1)
            .return_const(());

        let runner = PipelineRunner::new(engine.clone()).with_observer(Arc::new(observer));
        let outcome = runner.run(&two_stage()).await;

        let failure = outcome.failure().expect("run should fail");
        assert!(failure.error.contains("network timeout"));
        assert_eq!(failure.task.as_deref(), Some("research"));

        let seen: Vec<_> = engine.seen().into_iter().map(|(task, _)| task).collect();
        assert_eq!(seen, ["research"], "analysis must never execute");
    }

    #[tokio::test]
    async fn test_memory_flag_reaches_engine() {
        let engine = Arc::new(
            StubEngine::default()
                .with("research", Ok("R1"))
                .with("analysis", Ok("R2")),
        );
        let researcher = Arc::new(AgentProfile::builder("Researcher").build());
        let research = TaskSpec::new("research", "", "", researcher);
        let crew = Crew::from_definition(
            PipelineDefinition::new("R", "T").task(research).memory(false),
        )
        .unwrap();

        PipelineRunner::new(engine.clone()).run(&crew).await;
        PipelineRunner::new(engine.clone()).run(&two_stage()).await;

        assert_eq!(*engine.memory_flags.lock().unwrap(), [false, true, true]);
    }

    #[test]
    fn test_build_context_skips_missing_outputs() {
        let agent = Arc::new(AgentProfile::builder("Agent").build());
        let a = TaskSpec::new("a", "", "", agent.clone());
        let b = TaskSpec::new("b", "", "", agent).with_context(&a);

        assert_eq!(build_context(&b, &[a.clone()], &[]), "");
        assert_eq!(
            build_context(&b, &[a], &[ExecutionResult::new("a", "Agent", "A")]),
            "A"
        );
    }
}
