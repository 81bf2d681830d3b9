//! getInventoryStatus tool - stock levels and low-stock alerts

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError};

pub struct InventoryStatusTool;

#[async_trait]
impl Tool for InventoryStatusTool {
    fn name(&self) -> &'static str {
        "getInventoryStatus"
    }

    fn description(&self) -> &'static str {
        "Get current inventory levels for all tracked items, including low-stock alerts and days-until-stockout estimates."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(request_id = %ctx.request_id, "InventoryStatusTool::execute: called");
        Ok(serde_json::to_value(ctx.store.inventory_status())?)
    }
}
