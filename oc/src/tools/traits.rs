//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolContext, ToolError};

/// A data query the model can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the model's function name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Whether the tool is hidden unless neighborhood context is enabled
    fn requires_neighborhood(&self) -> bool {
        false
    }

    /// Execute the tool against already-parsed arguments
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}
