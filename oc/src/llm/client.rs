//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call carries the full transcript
///
/// The conversation driver owns the transcript and resends it every step, so
/// implementations keep no per-conversation state and can be shared across
/// concurrent requests.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one completion request and wait for the whole response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier, for logs
    fn model(&self) -> &str;
}
