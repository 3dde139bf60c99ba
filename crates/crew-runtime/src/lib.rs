//! Task engine runtime for crew-rs
//!
//! This crate provides [`LlmEngine`], the [`TaskEngine`](crew_core::TaskEngine)
//! implementation that performs an agent's reasoning by calling an
//! [`LLMProvider`](crew_llm::LLMProvider).

pub mod engine;
pub mod prompt;

// Re-export key types
pub use engine::{EngineConfig, LlmEngine, LlmEngineBuilder, USAGE_KEY};
