//! Environment-driven configuration
//!
//! Settings come from the process environment, after a `.env` file in the
//! working directory has been loaded. Variables already set in the
//! environment win over the file.

use thiserror::Error;
use tracing::debug;

/// Variable holding the required API credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Variable holding the optional API base URL
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";
/// Variable holding the optional default model
pub const MODEL_VAR: &str = "OPENAI_MODEL_NAME";

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// Default model name
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential is missing or empty
    #[error("{0} not found in environment variables")]
    MissingCredential(&'static str),

    /// A `.env` file exists but could not be read
    #[error("Failed to read env file: {0}")]
    EnvFile(String),
}

/// Runtime settings for the pipeline
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// API credential
    pub api_key: String,
    /// API base URL
    pub api_base: String,
    /// Default model
    pub model: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl Settings {
    /// Load `.env` from the working directory (if any), then read the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;

        Ok(Self {
            api_key,
            api_base: non_empty(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: non_empty(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Override the default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
