//! HTTP error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::agent::AgentError;

/// Failures surfaced by the chat API, always rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// No model credentials; carries the name of the missing variable
    #[error("{0} is not set. Copy .env.example to .env and add your key.")]
    MissingApiKey(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingApiKey(_) | Self::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Chat request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("message is required".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingApiKey("OPENAI_API_KEY".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Agent(AgentError::MaxRoundsExceeded).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            ApiError::MissingApiKey("OPENAI_API_KEY".to_string()).to_string(),
            "OPENAI_API_KEY is not set. Copy .env.example to .env and add your key."
        );
    }

    #[test]
    fn test_agent_error_passes_through() {
        let err: ApiError = AgentError::MaxRoundsExceeded.into();
        assert_eq!(err.to_string(), "Agent exceeded maximum tool-calling rounds");
    }
}
