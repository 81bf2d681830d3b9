//! getNeighborhoodContext tool - weather, events and reviews

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{RangeArgs, date_range_schema, parse_args};
use crate::tools::{Tool, ToolContext, ToolError};

pub struct NeighborhoodContextTool;

#[async_trait]
impl Tool for NeighborhoodContextTool {
    fn name(&self) -> &'static str {
        "getNeighborhoodContext"
    }

    fn description(&self) -> &'static str {
        "Get external neighborhood signals: weather forecasts, nearby events, and recent review sentiment for a date range. Only available when neighborhood context is enabled."
    }

    fn input_schema(&self) -> Value {
        date_range_schema()
    }

    fn requires_neighborhood(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(request_id = %ctx.request_id, "NeighborhoodContextTool::execute: called");
        let range = parse_args::<RangeArgs>(args)?.to_range()?;
        Ok(serde_json::to_value(ctx.store.neighborhood_context(&range))?)
    }
}
