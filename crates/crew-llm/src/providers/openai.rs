//! OpenAI chat completions provider
//!
//! Talks to `POST {api_base}/chat/completions`. Any server that speaks the
//! same protocol (vLLM, llama.cpp, LM Studio, Azure deployments) works by
//! pointing `api_base` at it.
//!
//! ```no_run
//! use crew_llm::{CompletionRequest, LLMProvider};
//! use crew_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # async fn example() -> crew_llm::Result<()> {
//! let config = OpenAIConfig::new("sk-...").with_api_base("http://localhost:1234/v1");
//! let provider = OpenAIProvider::with_config(config)?;
//!
//! let request = CompletionRequest::new("gpt-4o-mini").with_user("Size the market");
//! let response = provider.complete(request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default API base URL
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the OpenAI provider
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Bearer token
    pub api_key: String,
    /// Base URL without a trailing slash
    pub api_base: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAIConfig {
    /// Settings for the public API with the default timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point at another OpenAI-compatible server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the chat completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

/// Provider for the OpenAI chat completions API
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a provider with an HTTP client honoring the configured timeout
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a provider for the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip_all, fields(model = %request.model, endpoint = %self.config.endpoint()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = wire::ChatRequest::from_request(&request);
        debug!(prompt_chars = request.prompt_chars(), "Sending chat completion");

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &request.model));
        }

        let reply: wire::ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;
        reply.into_completion()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Classify a non-success HTTP status
///
/// Server-side failures map to [`LLMError::RequestFailed`] so they are retried.
fn status_error(status: StatusCode, body: &str, model: &str) -> LLMError {
    let detail = wire::error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimitExceeded(detail),
        StatusCode::NOT_FOUND => LLMError::ModelNotFound(model.to_string()),
        s if s.is_client_error() => LLMError::InvalidRequest(detail),
        s => LLMError::RequestFailed(format!("HTTP {s}: {detail}")),
    }
}

/// Wire format of the chat completions endpoint
mod wire {
    use super::{
        CompletionRequest, CompletionResponse, LLMError, Message, Result, StopReason, TokenUsage,
    };
    use serde::{Deserialize, Serialize};
    use tracing::{debug, warn};

    #[derive(Debug, Serialize)]
    pub(super) struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage<'a>>,
        pub max_tokens: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub temperature: Option<f32>,
    }

    #[derive(Debug, Serialize)]
    pub(super) struct ChatMessage<'a> {
        pub role: &'static str,
        pub content: &'a str,
    }

    impl<'a> ChatRequest<'a> {
        /// Borrow a request; the system prompt becomes the leading message
        pub fn from_request(request: &'a CompletionRequest) -> Self {
            let system = request.system.as_deref().map(|content| ChatMessage {
                role: "system",
                content,
            });
            let turns = request.messages.iter().map(|m| ChatMessage {
                role: m.role.as_str(),
                content: m.text(),
            });

            Self {
                model: &request.model,
                messages: system.into_iter().chain(turns).collect(),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ChatResponse {
        pub choices: Vec<Choice>,
        #[serde(default)]
        pub usage: Usage,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Choice {
        pub message: ReplyMessage,
        #[serde(default)]
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ReplyMessage {
        #[serde(default)]
        pub content: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct Usage {
        #[serde(default)]
        pub prompt_tokens: usize,
        #[serde(default)]
        pub completion_tokens: usize,
    }

    impl ChatResponse {
        /// Keep the first choice
        pub fn into_completion(self) -> Result<CompletionResponse> {
            let choice = self.choices.into_iter().next().ok_or_else(|| {
                LLMError::UnexpectedResponse("No choices in response".to_string())
            })?;

            let stop_reason = stop_reason(choice.finish_reason.as_deref());
            debug!(
                ?stop_reason,
                prompt_tokens = self.usage.prompt_tokens,
                completion_tokens = self.usage.completion_tokens,
                "Received chat completion"
            );

            Ok(CompletionResponse {
                message: Message::assistant(choice.message.content.unwrap_or_default()),
                stop_reason,
                usage: TokenUsage {
                    prompt_tokens: self.usage.prompt_tokens,
                    completion_tokens: self.usage.completion_tokens,
                },
            })
        }
    }

    pub(super) fn stop_reason(finish_reason: Option<&str>) -> StopReason {
        match finish_reason {
            Some("stop") | None => StopReason::EndTurn,
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::ContentFilter,
            Some(other) => {
                warn!("Unknown finish_reason '{}', treating as end of turn", other);
                StopReason::EndTurn
            }
        }
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    /// Extract `error.message` from an API error body
    pub(super) fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error.message)
    }
}
