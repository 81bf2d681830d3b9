//! OpsCopilot - Neighborhood-aware seller ops copilot
//!
//! A model answers seller questions by calling a fixed catalogue of data tools,
//! then returns one JSON answer that must pass the output contract.
//!
//! # Modules
//!
//! - [`tools`] - Tool catalogue and safe dispatch
//! - [`output`] - Answer contract types and validation
//! - [`agent`] - The tool-calling conversation driver
//! - [`llm`] - Model provider clients
//! - [`server`] - HTTP API
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod output;
pub mod server;
pub mod tools;

pub use agent::{AgentError, AgentReply, CopilotAgent};
pub use config::{AgentConfig, Config, LlmConfig};
pub use llm::{LlmClient, LlmError, MockLlmClient, create_client};
pub use output::{CopilotOutput, ValidationIssue, validate};
pub use tools::{Tool, ToolContext, ToolError, ToolRegistry};
