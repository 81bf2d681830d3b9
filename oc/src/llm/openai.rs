//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, StopReason, TokenUsage, ToolCall};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(provider = %config.provider, model = %config.model, "OpenAIClient::from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "OpenAIClient::build_request_body: called");

        let max_tokens = request.max_tokens.min(self.max_tokens);

        // o-series and gpt-5 models take max_completion_tokens and reject temperature
        let reasoning_model =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": convert_messages(&request.messages),
        });

        if reasoning_model {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
            body["temperature"] = serde_json::json!(request.temperature.unwrap_or(self.temperature));
        }

        if !request.tools.is_empty() {
            debug!("OpenAIClient::build_request_body: adding tools");
            body["tools"] = serde_json::json!(request.tools.iter().map(|t| t.to_openai_schema()).collect::<Vec<_>>());
            body["tool_choice"] = serde_json::json!("auto");
        }

        body
    }

    /// Parse the OpenAI API response
    fn parse_response(&self, api_response: OpenAIResponse) -> Result<CompletionResponse, LlmError> {
        debug!(choice_count = %api_response.choices.len(), "OpenAIClient::parse_response: called");
        let choice = api_response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content,
            tool_calls,
            stop_reason: StopReason::from_openai(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

/// Convert the transcript to OpenAI chat messages, one per entry
fn convert_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    debug!(message_count = %messages.len(), "convert_messages: called");
    messages
        .iter()
        .map(|msg| match msg {
            Message::System { content } => serde_json::json!({ "role": "system", "content": content }),
            Message::User { content } => serde_json::json!({ "role": "user", "content": content }),
            Message::Assistant { content, tool_calls } => {
                let mut value = serde_json::json!({ "role": "assistant", "content": content });
                if !tool_calls.is_empty() {
                    value["tool_calls"] = serde_json::json!(
                        tool_calls
                            .iter()
                            .map(|tc| serde_json::json!({
                                "id": tc.id,
                                "type": "function",
                                "function": { "name": tc.name, "arguments": tc.arguments },
                            }))
                            .collect::<Vec<_>>()
                    );
                }
                value
            }
            Message::Tool { tool_call_id, content } => serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_call_id,
                "content": content,
            }),
        })
        .collect()
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "OpenAIClient::complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "OpenAIClient::complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let error = match self
                .http
                .post(url.clone())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    debug!("OpenAIClient::complete: success");
                    let api_response: OpenAIResponse = response.json().await?;
                    return self.parse_response(api_response);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok());
                    let text = response.text().await.unwrap_or_default();
                    debug!(attempt, status, "OpenAIClient::complete: API error");
                    LlmError::from_status(status, retry_after, text)
                }
                Err(e) => {
                    debug!(attempt, error = %e, "OpenAIClient::complete: network error");
                    LlmError::Network(e)
                }
            };

            if !error.is_retryable() || attempt >= MAX_RETRIES {
                return Err(error);
            }
            attempt += 1;
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolDefinition;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client(model: &str, max_tokens: u32) -> OpenAIClient {
        OpenAIClient {
            model: model.to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens,
            temperature: 0.2,
        }
    }

    fn request(messages: Vec<Message>, tools: Vec<ToolDefinition>) -> CompletionRequest {
        CompletionRequest {
            messages,
            tools,
            max_tokens: 1000,
            temperature: None,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let body = client("gpt-4o", 8192).build_request_body(&request(
            vec![Message::system("You are helpful"), Message::user("Hello")],
            vec![],
        ));

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 1000);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_build_request_body_with_tools() {
        let tool = ToolDefinition::new("getInventoryStatus", "Stock", serde_json::json!({"type": "object"}));
        let body = client("gpt-4o", 8192).build_request_body(&request(vec![Message::user("stock?")], vec![tool]));

        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "getInventoryStatus");
    }

    #[test]
    fn test_max_tokens_capped() {
        let mut req = request(vec![], vec![]);
        req.max_tokens = 5000;
        let body = client("gpt-4o", 1000).build_request_body(&req);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_reasoning_model_uses_completion_tokens() {
        let body = client("o3-mini", 8192).build_request_body(&request(vec![], vec![]));
        assert_eq!(body["max_completion_tokens"], 1000);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_convert_tool_round_trip_messages() {
        let messages = vec![
            Message::assistant(None, vec![ToolCall::new("call_1", "getSalesSummary", "{\"startDate\":\"2026-02-01\"")]),
            Message::tool_result("call_1", "{\"error\":\"Tool getSalesSummary failed: missing field\"}"),
        ];
        let converted = convert_messages(&messages);

        assert_eq!(converted[0]["role"], "assistant");
        assert!(converted[0]["content"].is_null());
        assert_eq!(converted[0]["tool_calls"][0]["id"], "call_1");
        // Malformed arguments are echoed back untouched
        assert_eq!(
            converted[0]["tool_calls"][0]["function"]["arguments"],
            "{\"startDate\":\"2026-02-01\""
        );
        assert_eq!(converted[1]["role"], "tool");
        assert_eq!(converted[1]["tool_call_id"], "call_1");
    }

    #[test]
    fn test_parse_response_tool_calls() {
        let api: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": { "name": "getTopItems", "arguments": "{\"limit\":3}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": { "prompt_tokens": 120, "completion_tokens": 15 }
        }))
        .unwrap();

        let resp = client("gpt-4o", 8192).parse_response(api).unwrap();
        assert_eq!(resp.stop_reason, StopReason::ToolUse);
        assert_eq!(resp.tool_calls[0].name, "getTopItems");
        assert_eq!(resp.tool_calls[0].arguments, "{\"limit\":3}");
        assert_eq!(resp.usage.input_tokens, 120);
    }

    #[test]
    fn test_parse_response_without_choices_is_empty_response() {
        let api: OpenAIResponse = serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        let err = client("gpt-4o", 8192).parse_response(api).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[derive(Clone)]
    struct Scripted {
        statuses: Arc<Vec<u16>>,
        hits: Arc<AtomicUsize>,
    }

    async fn scripted_reply(State(script): State<Scripted>) -> Response {
        let hit = script.hits.fetch_add(1, Ordering::SeqCst);
        let status = script.statuses[hit.min(script.statuses.len() - 1)];
        if status == 200 {
            return Json(serde_json::json!({
                "choices": [{ "message": { "content": "{}" }, "finish_reason": "stop" }],
                "usage": { "prompt_tokens": 3, "completion_tokens": 1 }
            }))
            .into_response();
        }
        let code = StatusCode::from_u16(status).unwrap();
        (code, [("retry-after", "7")], "scripted failure").into_response()
    }

    /// Client pointed at a local server answering with `statuses` in order
    async fn scripted_client(statuses: Vec<u16>) -> (OpenAIClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let script = Scripted {
            statuses: Arc::new(statuses),
            hits: hits.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(scripted_reply))
            .with_state(script);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mut client = client("gpt-4o", 8192);
        client.base_url = format!("http://{}", addr);
        client.http = Client::builder().no_proxy().build().unwrap();
        (client, hits)
    }

    fn hello() -> CompletionRequest {
        request(vec![Message::user("Hello")], vec![])
    }

    #[tokio::test]
    async fn test_rate_limit_returned_without_retry() {
        let (client, hits) = scripted_client(vec![429]).await;

        let err = client.complete(hello()).await.unwrap_err();

        assert!(matches!(err, LlmError::RateLimited { retry_after } if retry_after == Duration::from_secs(7)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_error_returned_without_retry() {
        let (client, hits) = scripted_client(vec![400]).await;

        let err = client.complete(hello()).await.unwrap_err();

        assert!(matches!(err, LlmError::ApiError { status: 400, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let (client, hits) = scripted_client(vec![503, 200]).await;

        let resp = client.complete(hello()).await.unwrap();

        assert_eq!(resp.content.as_deref(), Some("{}"));
        assert_eq!(resp.usage.input_tokens, 3);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
