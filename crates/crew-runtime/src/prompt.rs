//! Prompt layout for task execution
//!
//! The layout is fixed: the agent profile becomes the system prompt and the
//! task, its expected output and any context become the user message.

use crew_core::{AgentProfile, RunMemory, TaskInput};

/// Build the system prompt for an agent
pub fn system_prompt(agent: &AgentProfile) -> String {
    let mut prompt = format!("You are {}.", agent.role());
    if !agent.backstory().is_empty() {
        prompt.push_str(&format!(" {}", normalize(agent.backstory())));
    }
    if !agent.goal().is_empty() {
        prompt.push_str(&format!("\nYour personal goal is: {}", agent.goal()));
    }
    if !agent.allow_delegation() {
        prompt.push_str("\nYou work alone and must produce the full answer yourself.");
    }
    prompt
}

/// Build the user message for a task
///
/// Remembered outputs from earlier tasks in the run are included only when
/// memory is enabled and they are not already part of the explicit context.
pub fn task_prompt(input: &TaskInput<'_>, memory: &RunMemory) -> String {
    let task = input.task;
    let mut prompt = format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        normalize(task.description()),
        normalize(task.expected_output()),
    );

    if input.has_context() {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(input.context);
    }

    if memory.is_enabled() {
        let notes: Vec<_> = memory
            .entries()
            .iter()
            .filter(|entry| !input.context.contains(entry.content.as_str()))
            .map(|entry| format!("- {} ({}): {}", entry.task, entry.agent, entry.content))
            .collect();
        if !notes.is_empty() {
            prompt.push_str("\n\nNotes from earlier tasks in this run:\n");
            prompt.push_str(&notes.join("\n"));
        }
    }

    prompt.push_str("\n\nBegin! This is VERY important to you, use your best judgment.");
    prompt
}

/// Collapse the indentation that multi-line literals carry
fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
