//! CopilotAgent - drives the model through tool calls to a validated answer
//!
//! One `run` is one conversation:
//! 1. Seed the transcript with the system prompt and the flagged question
//! 2. Ask the model for a step with the visible tool catalogue
//! 3. Execute requested tools in order and append their results
//! 4. Repeat until the model answers without tool calls, or the round cap is hit
//! 5. Strip fences, parse and validate the answer

use std::sync::{Arc, LazyLock};

use eyre::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use sellerstore::SellerStore;

use super::error::AgentError;
use super::prompt::{SYSTEM_PROMPT, load_system_prompt};
use crate::config::{AgentConfig, Config};
use crate::llm::{self, CompletionRequest, CompletionResponse, LlmClient, Message, TokenUsage, ToolDefinition};
use crate::output::{self, CopilotOutput};
use crate::tools::{ToolContext, ToolRegistry, parse_arguments};

static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```(?:json)?\s*").expect("fence opener pattern"));
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\s*$").expect("fence closer pattern"));

const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// A validated answer plus what it took to get there
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub request_id: String,
    pub output: CopilotOutput,
    /// Model steps taken, including the final one
    pub rounds: u32,
    /// Registered tools the model invoked, in invocation order
    pub tools_invoked: Vec<String>,
    pub usage: TokenUsage,
}

/// Conversation driver
///
/// Holds no per-request state; concurrent `run`s share only the read-only store.
pub struct CopilotAgent {
    llm: Arc<dyn LlmClient>,
    registry: Arc<ToolRegistry>,
    store: Arc<SellerStore>,
    config: AgentConfig,
    system_prompt: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl CopilotAgent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        registry: Arc<ToolRegistry>,
        store: Arc<SellerStore>,
        config: AgentConfig,
    ) -> Self {
        debug!(model = %llm.model(), tools = registry.len(), max_rounds = config.max_rounds, "CopilotAgent::new: called");
        Self {
            llm,
            registry,
            store,
            config,
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }

    /// Build the store, client, registry and prompt described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!(data_dir = %config.data.dir.display(), "CopilotAgent::from_config: called");
        let store = SellerStore::open(&config.data.dir)
            .context(format!("Failed to load seller data from {}", config.data.dir.display()))?;
        let llm = llm::create_client(&config.llm).context("Failed to create LLM client")?;
        let system_prompt = load_system_prompt(config.agent.system_prompt_path.as_deref())?;

        Ok(Self::new(
            llm,
            Arc::new(ToolRegistry::standard()),
            Arc::new(store),
            config.agent.clone(),
        )
        .with_system_prompt(system_prompt)
        .with_sampling(config.llm.max_tokens, Some(config.llm.temperature)))
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: Option<f32>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Answer `question` with no external cancellation
    pub async fn run(&self, question: &str, neighborhood_enabled: bool) -> Result<AgentReply, AgentError> {
        let (_tx, rx) = watch::channel(false);
        self.run_until(question, neighborhood_enabled, rx).await
    }

    /// Answer `question`, giving up at the next round boundary once `cancel` reads true
    pub async fn run_until(
        &self,
        question: &str,
        neighborhood_enabled: bool,
        cancel: watch::Receiver<bool>,
    ) -> Result<AgentReply, AgentError> {
        let request_id = uuid::Uuid::now_v7().to_string();
        debug!(%request_id, %neighborhood_enabled, question_len = question.len(), "CopilotAgent::run_until: called");
        info!(%request_id, %neighborhood_enabled, "Question received");

        let tools = self.registry.list_available(neighborhood_enabled);
        let ctx = ToolContext::new(self.store.clone(), request_id.clone());
        let mut messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(seed_message(question, neighborhood_enabled)),
        ];
        let mut usage = TokenUsage::default();
        let mut tools_invoked: Vec<String> = Vec::new();

        for round in 1..=self.config.max_rounds {
            let cancelled = *cancel.borrow();
            if cancelled {
                info!(%request_id, round, "Request cancelled");
                return Err(AgentError::Cancelled);
            }

            let response = self.step(&request_id, round, &messages, &tools).await?;
            usage.add(&response.usage);
            messages.push(Message::assistant(response.content.clone(), response.tool_calls.clone()));

            if !response.has_tool_calls() {
                debug!(%request_id, round, "CopilotAgent::run_until: model finalized");
                let output = self.finalize(response.content.as_deref().unwrap_or(""), &tools_invoked)?;
                info!(
                    %request_id,
                    rounds = round,
                    metrics = output.metrics.len(),
                    actions = output.actions.len(),
                    tokens = usage.total(),
                    "Answer delivered"
                );
                return Ok(AgentReply {
                    request_id,
                    output,
                    rounds: round,
                    tools_invoked,
                    usage,
                });
            }

            for call in &response.tool_calls {
                let args = parse_arguments(&call.arguments);
                info!(%request_id, round, tool = %call.name, args = %args, "Tool call");
                let result = self.registry.execute(&call.name, args, &ctx).await;
                if self.registry.has_tool(&call.name) {
                    tools_invoked.push(call.name.clone());
                }
                messages.push(Message::tool_result(call.id.clone(), result.to_string()));
            }
        }

        warn!(%request_id, max_rounds = self.config.max_rounds, "Round cap reached without a final answer");
        Err(AgentError::MaxRoundsExceeded)
    }

    /// One model round-trip under the per-round timeout
    async fn step(
        &self,
        request_id: &str,
        round: u32,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<CompletionResponse, AgentError> {
        debug!(%request_id, round, messages = messages.len(), "CopilotAgent::step: called");
        let request = CompletionRequest {
            messages: messages.to_vec(),
            tools: tools.to_vec(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let timeout = self.config.round_timeout();
        let response = match tokio::time::timeout(timeout, self.llm.complete(request)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(%request_id, round, timeout_ms = timeout.as_millis() as u64, "LLM round timed out");
                return Err(AgentError::RoundTimeout { round, timeout });
            }
        };

        info!(
            %request_id,
            round,
            tool_calls = response.tool_calls.len(),
            stop_reason = ?response.stop_reason,
            "Model step complete"
        );
        Ok(response)
    }

    fn finalize(&self, raw: &str, tools_invoked: &[String]) -> Result<CopilotOutput, AgentError> {
        debug!(raw_len = raw.len(), "CopilotAgent::finalize: called");
        let cleaned = strip_fences(raw);
        let parsed: serde_json::Value =
            serde_json::from_str(&cleaned).map_err(|e| AgentError::invalid_json(&e, raw))?;

        let output = output::validate(&parsed).map_err(AgentError::SchemaValidation)?;

        if self.config.enforce_source_coverage {
            output::check_source_coverage(&output, tools_invoked).map_err(AgentError::SourceCoverage)?;
        }
        Ok(output)
    }
}

/// User message carrying the neighborhood flag ahead of the question
pub fn seed_message(question: &str, neighborhood_enabled: bool) -> String {
    format!("neighborhood_context_enabled: {}\n\n{}", neighborhood_enabled, question)
}

/// Remove a ```` ``` ```` or ```` ```json ```` wrapper from model output
///
/// Text that does not start with a fence is only trimmed.
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let opened = FENCE_OPEN.replace(trimmed, "");
    FENCE_CLOSE.replace(&opened, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, ToolCall};
    use std::path::Path;

    fn store() -> Arc<SellerStore> {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../ss/fixtures");
        Arc::new(SellerStore::open(dir).unwrap())
    }

    fn agent(mock: Arc<MockLlmClient>, config: AgentConfig) -> CopilotAgent {
        CopilotAgent::new(mock, Arc::new(ToolRegistry::standard()), store(), config)
    }

    const VALID: &str = r#"{"answer_markdown":"Revenue was $100.","sources":[{"type":"table","detail":"getSalesSummary"}]}"#;

    #[test]
    fn test_seed_message() {
        assert_eq!(
            seed_message("How were sales?", true),
            "neighborhood_context_enabled: true\n\nHow were sales?"
        );
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}\n");
        assert_eq!(strip_fences("```\n{\"a\":1}```  "), "{\"a\":1}");
        assert_eq!(strip_fences("  {\"a\":1}  "), "{\"a\":1}");
        // A fence that is not at the start is left alone
        assert_eq!(strip_fences("Here: ```json {}```"), "Here: ```json {}```");
    }

    #[tokio::test]
    async fn test_system_prompt_and_sampling_sent() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(VALID)]));
        let agent = agent(mock.clone(), AgentConfig::default())
            .with_system_prompt("Be brief.")
            .with_sampling(512, None);

        agent.run("Sales?", false).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.messages[0], Message::system("Be brief."));
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.temperature, None);
    }

    #[tokio::test]
    async fn test_unknown_tools_not_recorded_as_invoked() {
        let mock = Arc::new(MockLlmClient::new(vec![
            CompletionResponse::tool_calls(vec![
                ToolCall::new("c1", "getWeatherForecast", "{}"),
                ToolCall::new("c2", "getInventoryStatus", "{}"),
            ]),
            CompletionResponse::text(VALID),
        ]));

        let reply = agent(mock.clone(), AgentConfig::default()).run("Stock?", false).await.unwrap();
        assert_eq!(reply.tools_invoked, vec!["getInventoryStatus".to_string()]);
        assert_eq!(reply.rounds, 2);

        let second = &mock.requests()[1];
        let Message::Tool { content, .. } = &second.messages[3] else {
            panic!("expected tool result");
        };
        assert!(content.contains("Unknown tool: getWeatherForecast"));
    }

    #[tokio::test]
    async fn test_source_coverage_enforced_when_enabled() {
        let script = || {
            vec![
                CompletionResponse::tool_calls(vec![ToolCall::new("c1", "getInventoryStatus", "{}")]),
                CompletionResponse::text(VALID),
            ]
        };

        let lenient = agent(Arc::new(MockLlmClient::new(script())), AgentConfig::default());
        assert!(lenient.run("Stock?", false).await.is_ok());

        let strict_config = AgentConfig {
            enforce_source_coverage: true,
            ..AgentConfig::default()
        };
        let strict = agent(Arc::new(MockLlmClient::new(script())), strict_config);
        let err = strict.run("Stock?", false).await.unwrap_err();
        assert!(matches!(err, AgentError::SourceCoverage(ref missing) if missing == &["getInventoryStatus".to_string()]));
    }

    #[tokio::test]
    async fn test_missing_content_is_invalid_json() {
        let mut empty = CompletionResponse::text("");
        empty.content = None;
        let mock = Arc::new(MockLlmClient::new(vec![empty]));

        let err = agent(mock, AgentConfig::default()).run("Sales?", false).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidJson { .. }));
    }

    #[tokio::test]
    async fn test_usage_accumulates() {
        let mut first = CompletionResponse::tool_calls(vec![ToolCall::new("c1", "getInventoryStatus", "{}")]);
        first.usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 20,
        };
        let mut last = CompletionResponse::text(VALID);
        last.usage = TokenUsage {
            input_tokens: 300,
            output_tokens: 50,
        };
        let mock = Arc::new(MockLlmClient::new(vec![first, last]));

        let reply = agent(mock, AgentConfig::default()).run("Stock?", false).await.unwrap();
        assert_eq!(reply.usage.total(), 470);
    }
}
