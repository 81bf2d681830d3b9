//! getStaffingSignals tool - peak-hour staffing coverage

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{RangeArgs, date_range_schema, parse_args};
use crate::tools::{Tool, ToolContext, ToolError};

pub struct StaffingSignalsTool;

#[async_trait]
impl Tool for StaffingSignalsTool {
    fn name(&self) -> &'static str {
        "getStaffingSignals"
    }

    fn description(&self) -> &'static str {
        "Get staffing coverage vs. peak traffic signals for a date range. Identifies potential under- or over-staffing."
    }

    fn input_schema(&self) -> Value {
        date_range_schema()
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(request_id = %ctx.request_id, "StaffingSignalsTool::execute: called");
        let range = parse_args::<RangeArgs>(args)?.to_range()?;
        Ok(serde_json::to_value(ctx.store.staffing_signals(&range))?)
    }
}
