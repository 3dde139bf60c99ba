//! Console progress reporting

use crew_core::{ExecutionResult, TaskSpec};
use crew_workflow::RunObserver;

/// Width of the banner rules printed around summaries
pub const BANNER_WIDTH: usize = 50;

/// Prints one line per pipeline stage to stdout
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_run_start(&self, total: usize) {
        println!("Executing market analysis crew ({total} tasks)...");
    }

    fn on_task_start(&self, index: usize, total: usize, task: &TaskSpec) {
        println!(
            "[{}/{}] {} is working on: {}",
            index + 1,
            total,
            task.agent().role(),
            task.name()
        );
    }

    fn on_task_complete(&self, index: usize, total: usize, result: &ExecutionResult) {
        println!("[{}/{}] {} completed", index + 1, total, result.task);
    }

    fn on_task_failed(&self, index: usize, total: usize, task: &TaskSpec, error: &str) {
        println!("[{}/{}] {} failed: {error}", index + 1, total, task.name());
    }
}

/// Print `title` between two rules
pub fn print_banner(title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{rule}\n{title}\n{rule}");
}
