//! LLM-backed task engine
//!
//! `LlmEngine` performs one completion per task: the agent profile becomes the
//! system prompt, the task and its context the user message. Transient
//! provider failures are retried with exponential backoff up to the agent's
//! retry limit; anything else fails the task immediately.

use crate::prompt;
use crew_core::{ExecutionResult, Result, RunMemory, TaskEngine, TaskInput};
use crew_llm::{CompletionRequest, CompletionResponse, LLMProvider, StopReason, TokenUsage};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Run memory key holding the cumulative [`TokenUsage`] of a run
pub const USAGE_KEY: &str = "token_usage";

/// Configuration for the LLM engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model used when the agent has no override
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: Option<f32>,

    /// Backoff before the first retry; doubles on each further attempt
    pub retry_backoff_base: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: Some(0.7),
            retry_backoff_base: Duration::from_secs(1),
        }
    }
}

impl EngineConfig {
    /// Get retry backoff duration for attempt number
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base * 2_u32.saturating_pow(attempt)
    }
}

/// Engine that runs tasks through an LLM provider
///
/// # Example
///
/// ```no_run
/// use crew_llm::providers::OpenAIProvider;
/// use crew_runtime::LlmEngine;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenAIProvider::new("sk-...")?);
/// let engine = LlmEngine::builder()
///     .provider(provider)
///     .model("gpt-4o-mini")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct LlmEngine {
    provider: Arc<dyn LLMProvider>,
    config: EngineConfig,
}

impl LlmEngine {
    /// Create a new engine
    pub fn new(provider: Arc<dyn LLMProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Create a new engine builder
    pub fn builder() -> LlmEngineBuilder {
        LlmEngineBuilder::new()
    }

    fn build_request(&self, input: &TaskInput<'_>, memory: &RunMemory) -> CompletionRequest {
        let agent = input.task.agent();
        let model = agent.llm().unwrap_or(self.config.model.as_str());

        let request = CompletionRequest::new(model)
            .with_system(prompt::system_prompt(agent))
            .with_user(prompt::task_prompt(input, memory))
            .with_max_tokens(self.config.max_tokens);
        match self.config.temperature {
            Some(temperature) => request.with_temperature(temperature),
            None => request,
        }
    }

    async fn complete_with_retry(
        &self,
        request: CompletionRequest,
        max_retries: u32,
    ) -> crew_llm::Result<CompletionResponse> {
        let mut attempt = 0;
        loop {
            match self.provider.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < max_retries => {
                    let backoff = self.config.retry_backoff(attempt);
                    warn!(
                        "Transient provider error (attempt {}/{}): {}. Retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl TaskEngine for LlmEngine {
    #[instrument(
        skip(self, input, memory),
        fields(
            task = %input.task.name(),
            agent = %input.task.agent().role(),
            allow_delegation = input.task.agent().allow_delegation(),
            run_id = %memory.run_id(),
        )
    )]
    async fn execute(
        &self,
        input: TaskInput<'_>,
        memory: &mut RunMemory,
    ) -> Result<ExecutionResult> {
        let task = input.task;
        let agent = task.agent();
        let request = self.build_request(&input, memory);
        debug!(model = %request.model, "Calling provider '{}'", self.provider.name());

        let response = self
            .complete_with_retry(request, agent.max_retry_limit())
            .await
            .map_err(|e| crew_core::Error::engine(task.name(), e.to_string()))?;

        let run_usage = accumulate_usage(memory, response.usage)?;
        debug!(
            "Provider response - stop_reason: {:?}, tokens: {} (run total {})",
            response.stop_reason,
            response.usage.total(),
            run_usage.total()
        );

        match response.stop_reason {
            StopReason::EndTurn => {}
            StopReason::MaxTokens => warn!("Response truncated due to token limit"),
            StopReason::ContentFilter => {
                return Err(crew_core::Error::engine(
                    task.name(),
                    "response withheld by the provider's content filter",
                ));
            }
        }

        let text = response.message.content;
        if text.trim().is_empty() {
            return Err(crew_core::Error::engine(task.name(), "empty response from model"));
        }

        if memory.is_enabled() {
            memory.record(task.name(), agent.role(), text.clone());
        }

        info!("Task '{}' produced {} characters", task.name(), text.chars().count());
        Ok(ExecutionResult::new(task.name(), agent.role(), text))
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Add one call's token usage to the run's running total
fn accumulate_usage(memory: &mut RunMemory, usage: TokenUsage) -> Result<TokenUsage> {
    let mut total: TokenUsage = memory.get_typed(USAGE_KEY)?.unwrap_or_default();
    total.prompt_tokens += usage.prompt_tokens;
    total.completion_tokens += usage.completion_tokens;
    memory.insert_typed(USAGE_KEY, &total)?;
    Ok(total)
}

/// Builder for LlmEngine
pub struct LlmEngineBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    config: EngineConfig,
}

impl LlmEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            config: EngineConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the default model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.config.retry_backoff_base = duration;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<LlmEngine> {
        let provider = self.provider.ok_or_else(|| {
            crew_core::Error::InitializationFailed("Provider not set".to_string())
        })?;

        Ok(LlmEngine::new(provider, self.config))
    }
}

impl Default for LlmEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
