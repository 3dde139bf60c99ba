//! Market analysis pipeline
//!
//! A Researcher agent surveys the AI-powered healthcare market, then an
//! Analyst agent turns that research into ranked investment opportunities.
//! The final analysis is saved as a timestamped markdown report.

pub mod app;
pub mod console;
pub mod definition;

pub use app::{AnalysisOutcome, run_analysis, token_usage};
pub use console::ConsoleObserver;
pub use definition::market_analysis;
