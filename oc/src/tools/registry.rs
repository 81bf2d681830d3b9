//! ToolRegistry - ordered tool catalogue and name-based dispatch

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm::ToolDefinition;

use super::builtin::{
    HourlySalesTool, InventoryStatusTool, NeighborhoodContextTool, SalesSummaryTool, StaffingSignalsTool, TopItemsTool,
};
use super::{Tool, ToolContext};

/// Immutable catalogue of tools, in presentation order
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Registry with the six seller data tools
    pub fn standard() -> Self {
        debug!("ToolRegistry::standard: called");
        let mut registry = Self::empty();
        registry.add_tool(Box::new(SalesSummaryTool));
        registry.add_tool(Box::new(HourlySalesTool));
        registry.add_tool(Box::new(TopItemsTool));
        registry.add_tool(Box::new(InventoryStatusTool));
        registry.add_tool(Box::new(StaffingSignalsTool));
        registry.add_tool(Box::new(NeighborhoodContextTool));
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        debug!("ToolRegistry::empty: called");
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a tool; a later tool with the same name replaces the earlier one in place
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolRegistry::add_tool: called");
        match self.index.get(tool.name()) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(tool.name(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Tool descriptors the model may see this turn
    ///
    /// Neighborhood tools are left out unless `neighborhood_enabled` is set; this
    /// is the only place that decision is made.
    pub fn list_available(&self, neighborhood_enabled: bool) -> Vec<ToolDefinition> {
        debug!(%neighborhood_enabled, "ToolRegistry::list_available: called");
        self.tools
            .iter()
            .filter(|t| neighborhood_enabled || !t.requires_neighborhood())
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Execute a tool by name, always producing a JSON result
    ///
    /// Unknown names and handler failures come back as `{"error": ...}` payloads.
    pub async fn execute(&self, name: &str, args: Value, ctx: &ToolContext) -> Value {
        debug!(%name, request_id = %ctx.request_id, "ToolRegistry::execute: called");
        let Some(tool) = self.index.get(name).map(|&slot| &self.tools[slot]) else {
            warn!(%name, request_id = %ctx.request_id, "Model requested unknown tool");
            return serde_json::json!({ "error": format!("Unknown tool: {}", name) });
        };

        match tool.execute(args, ctx).await {
            Ok(value) => {
                info!(%name, request_id = %ctx.request_id, "Tool executed");
                value
            }
            Err(e) => {
                warn!(%name, request_id = %ctx.request_id, error = %e, "Tool failed");
                serde_json::json!({ "error": format!("Tool {} failed: {}", name, e) })
            }
        }
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in catalogue order
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parse a model-supplied argument string into a JSON object
///
/// Anything that is not a JSON object (malformed text, arrays, scalars) becomes
/// `{}` so the handler reports the missing fields itself.
pub fn parse_arguments(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            debug!(kind = ?other, "parse_arguments: not an object, substituting {{}}");
            Value::Object(serde_json::Map::new())
        }
        Err(e) => {
            debug!(error = %e, "parse_arguments: malformed, substituting {{}}");
            Value::Object(serde_json::Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::ctx;
    use crate::tools::ToolError;
    use async_trait::async_trait;
    use proptest::prelude::*;

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &'static str {
            "explode"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        fn input_schema(&self) -> Value {
            serde_json::json!({ "type": "object", "properties": {} })
        }

        async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
            Err(ToolError::InvalidArgument("boom".to_string()))
        }
    }

    #[test]
    fn test_standard_catalogue_order() {
        let registry = ToolRegistry::standard();
        assert_eq!(
            registry.tool_names(),
            vec![
                "getSalesSummary",
                "getHourlySales",
                "getTopItems",
                "getInventoryStatus",
                "getStaffingSignals",
                "getNeighborhoodContext",
            ]
        );
    }

    #[test]
    fn test_list_available_hides_neighborhood_when_disabled() {
        let registry = ToolRegistry::standard();

        let off = registry.list_available(false);
        assert_eq!(off.len(), 5);
        assert!(off.iter().all(|t| t.name != "getNeighborhoodContext"));

        let on = registry.list_available(true);
        assert_eq!(on.len(), 6);
        assert_eq!(on[5].name, "getNeighborhoodContext");
    }

    #[test]
    fn test_list_available_includes_each_tool_once() {
        let on = ToolRegistry::standard().list_available(true);
        let mut names: Vec<&str> = on.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), on.len());
    }

    #[test]
    fn test_add_tool_replaces_same_name() {
        let mut registry = ToolRegistry::empty();
        registry.add_tool(Box::new(FailingTool));
        registry.add_tool(Box::new(FailingTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.has_tool("explode"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_returns_error_payload() {
        let result = ToolRegistry::standard()
            .execute("getWeather", serde_json::json!({}), &ctx())
            .await;
        assert_eq!(result, serde_json::json!({ "error": "Unknown tool: getWeather" }));
    }

    #[tokio::test]
    async fn test_execute_handler_failure_returns_error_payload() {
        let mut registry = ToolRegistry::empty();
        registry.add_tool(Box::new(FailingTool));

        let result = registry.execute("explode", serde_json::json!({}), &ctx()).await;
        assert_eq!(
            result,
            serde_json::json!({ "error": "Tool explode failed: Invalid argument: boom" })
        );
    }

    #[tokio::test]
    async fn test_execute_missing_arguments_reports_field() {
        let result = ToolRegistry::standard()
            .execute("getSalesSummary", serde_json::json!({}), &ctx())
            .await;
        let message = result["error"].as_str().unwrap();
        assert!(message.starts_with("Tool getSalesSummary failed:"));
        assert!(message.contains("startDate"));
    }

    #[tokio::test]
    async fn test_execute_success_returns_aggregate() {
        let result = ToolRegistry::standard()
            .execute("getInventoryStatus", serde_json::json!({}), &ctx())
            .await;
        assert_eq!(result["low_stock_count"], 2);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments("{\"limit\": 3}"), serde_json::json!({ "limit": 3 }));
        assert_eq!(parse_arguments("{not json"), serde_json::json!({}));
        assert_eq!(parse_arguments(""), serde_json::json!({}));
        assert_eq!(parse_arguments("[1, 2]"), serde_json::json!({}));
        assert_eq!(parse_arguments("null"), serde_json::json!({}));
    }

    proptest! {
        #[test]
        fn prop_parse_arguments_always_object(raw in ".*") {
            prop_assert!(parse_arguments(&raw).is_object());
        }

        #[test]
        fn prop_unknown_tool_never_fails(name in "[a-zA-Z_]{1,24}") {
            let registry = ToolRegistry::standard();
            prop_assume!(!registry.has_tool(&name));

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let result = rt.block_on(registry.execute(&name, serde_json::json!({}), &ctx()));
            prop_assert_eq!(result, serde_json::json!({ "error": format!("Unknown tool: {}", name) }));
        }
    }
}
