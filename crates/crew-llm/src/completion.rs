//! Completion request and response types
//!
//! A task run is a single turn: one system prompt describing the agent and
//! one user message describing the work. The types still carry a message list
//! so callers can prepend examples when they need to.

use crate::Message;
use serde::{Deserialize, Serialize};

/// Token budget used when the caller sets none
pub const DEFAULT_MAX_TOKENS: usize = 1024;

/// A chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Instructions sent ahead of the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Conversation turns, oldest first
    pub messages: Vec<Message>,

    /// Upper bound on generated tokens
    pub max_tokens: usize,

    /// Sampling temperature; provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Start a request for `model` with no messages
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            messages: Vec::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }

    /// Set the system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Append a user turn
    pub fn with_user(self, content: impl Into<String>) -> Self {
        self.with_message(Message::user(content))
    }

    /// Append any message
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Characters of prompt text across the system prompt and every message
    pub fn prompt_chars(&self) -> usize {
        self.system.as_deref().map_or(0, |s| s.chars().count())
            + self
                .messages
                .iter()
                .map(|m| m.text().chars().count())
                .sum::<usize>()
    }
}

/// A model's reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The assistant message
    pub message: Message,

    /// Why generation ended
    pub stop_reason: StopReason,

    /// Tokens billed for the call
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Reply text
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model finished its answer
    EndTurn,

    /// The token budget ran out mid-answer
    MaxTokens,

    /// The provider withheld the output
    ContentFilter,
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: usize,

    /// Tokens in the reply
    pub completion_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_setters() {
        let request = CompletionRequest::new("gpt-4o-mini")
            .with_system("You are a market researcher")
            .with_user("Size the market")
            .with_max_tokens(2048)
            .with_temperature(0.7);

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.system.as_deref(), Some("You are a market researcher"));
        assert_eq!(request.messages, vec![Message::user("Size the market")]);
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.prompt_chars(), 27 + 15);
    }

    #[test]
    fn test_defaults() {
        let request = CompletionRequest::new("m");
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(request.system.is_none());
        assert_eq!(request.prompt_chars(), 0);
    }

    #[test]
    fn test_usage_and_stop_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&StopReason::MaxTokens).unwrap(),
            r#""max_tokens""#
        );

        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
