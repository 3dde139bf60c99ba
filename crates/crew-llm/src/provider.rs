//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A backend that turns a completion request into a reply
///
/// Providers perform exactly one attempt per call. Retrying is left to the
/// caller, which can use [`crate::LLMError::is_transient`] to decide.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send `request` and wait for the complete reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider identifier used in logs
    fn name(&self) -> &str;
}
