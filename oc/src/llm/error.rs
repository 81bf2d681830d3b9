//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response from LLM")]
    EmptyResponse,

    #[error("LLM configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Classify a non-success HTTP status
    ///
    /// 429 becomes `RateLimited`, honouring a `retry-after` seconds header when present.
    pub fn from_status(status: u16, retry_after: Option<u64>, message: String) -> Self {
        if status == 429 {
            return LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after.unwrap_or(60)),
            };
        }
        LlmError::ApiError { status, message }
    }

    /// Check if the client should try the same request again
    ///
    /// Rate limits are surfaced to the caller rather than waited out inside a round.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::ApiError { status, .. } => matches!(status, 408 | 500 | 502 | 503 | 504 | 529),
            LlmError::Network(_) => true,
            LlmError::RateLimited { .. } => false,
            LlmError::InvalidResponse(_) => false,
            LlmError::EmptyResponse => false,
            LlmError::Config(_) => false,
        }
    }
}
