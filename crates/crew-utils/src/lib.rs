//! Shared utilities for crew-rs
//!
//! This crate provides common functionality used across the workspace:
//! logging setup and environment-driven configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, Settings};
pub use logging::init_tracing_with_default;
