//! Scripted LLM client for tests and offline runs

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError};

enum Script {
    Sequence(Vec<CompletionResponse>),
    Repeat(CompletionResponse),
}

/// Mock LLM client that replays scripted responses and records every request
pub struct MockLlmClient {
    script: Script,
    call_count: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl MockLlmClient {
    /// Replay `responses` in order, then fail with `InvalidResponse`
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        debug!(response_count = %responses.len(), "MockLlmClient::new: called");
        Self::with_script(Script::Sequence(responses))
    }

    /// Return `response` for every call
    pub fn repeating(response: CompletionResponse) -> Self {
        debug!("MockLlmClient::repeating: called");
        Self::with_script(Script::Repeat(response))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        debug!("MockLlmClient::call_count: called");
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, request: CompletionRequest) {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!("MockLlmClient::complete: called");
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.record(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.script {
            Script::Repeat(response) => Ok(response.clone()),
            Script::Sequence(responses) => {
                debug!(%idx, "MockLlmClient::complete: fetching response");
                responses.get(idx).cloned().ok_or_else(|| {
                    debug!("MockLlmClient::complete: no more mock responses");
                    LlmError::InvalidResponse("No more mock responses".to_string())
                })
            }
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Message, ToolCall};

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::user(text)],
            tools: vec![],
            max_tokens: 1000,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_mock_client_returns_responses_in_order() {
        let client = MockLlmClient::new(vec![
            CompletionResponse::text("Response 1"),
            CompletionResponse::text("Response 2"),
        ]);

        let resp1 = client.complete(request("a")).await.unwrap();
        assert_eq!(resp1.content.as_deref(), Some("Response 1"));

        let resp2 = client.complete(request("b")).await.unwrap();
        assert_eq!(resp2.content.as_deref(), Some("Response 2"));

        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_client_errors_when_exhausted() {
        let client = MockLlmClient::new(vec![]);
        let result = client.complete(request("a")).await;
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_mock_client_repeats_forever() {
        let client = MockLlmClient::repeating(CompletionResponse::tool_calls(vec![ToolCall::new(
            "call_1",
            "getInventoryStatus",
            "{}",
        )]));

        for _ in 0..20 {
            let resp = client.complete(request("again")).await.unwrap();
            assert!(resp.has_tool_calls());
        }
        assert_eq!(client.call_count(), 20);
    }

    #[tokio::test]
    async fn test_mock_client_records_requests() {
        let client = MockLlmClient::new(vec![CompletionResponse::text("ok")]);
        client.complete(request("hello")).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0], Message::user("hello"));
    }
}
