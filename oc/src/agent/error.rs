//! Conversation failures

use std::time::Duration;

use thiserror::Error;

use crate::llm::LlmError;
use crate::output::{ValidationIssue, format_issues};

/// Characters of raw model output kept in an [`AgentError::InvalidJson`]
pub const RAW_EXCERPT_CHARS: usize = 500;

/// Terminal failures of a conversation
///
/// Tool failures never show up here: they are fed back to the model as
/// result payloads.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM output is not valid JSON: {message}\n\nRaw output:\n{excerpt}")]
    InvalidJson { message: String, excerpt: String },

    #[error("LLM output failed schema validation: {}", format_issues(.0))]
    SchemaValidation(Vec<ValidationIssue>),

    #[error("Agent exceeded maximum tool-calling rounds")]
    MaxRoundsExceeded,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("LLM round {round} timed out after {}ms", .timeout.as_millis())]
    RoundTimeout { round: u32, timeout: Duration },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Sources do not cover invoked tools: {}", .0.join(", "))]
    SourceCoverage(Vec<String>),
}

impl AgentError {
    /// Build an `InvalidJson` from a parser error and the untouched model text
    pub fn invalid_json(err: &serde_json::Error, raw: &str) -> Self {
        Self::InvalidJson {
            message: err.to_string(),
            excerpt: raw.chars().take(RAW_EXCERPT_CHARS).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_truncates_raw() {
        let raw = "x".repeat(2000);
        let err = serde_json::from_str::<serde_json::Value>(&raw).unwrap_err();
        let agent_err = AgentError::invalid_json(&err, &raw);

        let msg = agent_err.to_string();
        assert!(msg.starts_with("LLM output is not valid JSON: "));
        let excerpt = msg.split("\n\nRaw output:\n").nth(1).unwrap();
        assert_eq!(excerpt.len(), RAW_EXCERPT_CHARS);
    }

    #[test]
    fn test_schema_validation_message() {
        let err = AgentError::SchemaValidation(vec![
            ValidationIssue {
                path: "sources".to_string(),
                message: "Required".to_string(),
            },
            ValidationIssue {
                path: "metrics".to_string(),
                message: "Array must contain at most 6 element(s)".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "LLM output failed schema validation: sources: Required; metrics: Array must contain at most 6 element(s)"
        );
    }

    #[test]
    fn test_display_passthrough() {
        assert_eq!(
            AgentError::MaxRoundsExceeded.to_string(),
            "Agent exceeded maximum tool-calling rounds"
        );
        assert_eq!(
            AgentError::from(LlmError::EmptyResponse).to_string(),
            "Empty response from LLM"
        );
        assert_eq!(
            AgentError::RoundTimeout {
                round: 3,
                timeout: Duration::from_millis(1500)
            }
            .to_string(),
            "LLM round 3 timed out after 1500ms"
        );
    }
}
