//! getHourlySales tool - hour-bucketed revenue and orders

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{RangeArgs, date_range_schema, parse_args};
use crate::tools::{Tool, ToolContext, ToolError};

pub struct HourlySalesTool;

#[async_trait]
impl Tool for HourlySalesTool {
    fn name(&self) -> &'static str {
        "getHourlySales"
    }

    fn description(&self) -> &'static str {
        "Get revenue and order count bucketed by hour (6–21) across a date range. Useful for finding peak hours."
    }

    fn input_schema(&self) -> Value {
        date_range_schema()
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(request_id = %ctx.request_id, "HourlySalesTool::execute: called");
        let range = parse_args::<RangeArgs>(args)?.to_range()?;
        Ok(serde_json::to_value(ctx.store.hourly_sales(&range))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::ctx;

    #[tokio::test]
    async fn test_hourly_sales_tool_reports_peak() {
        let result = HourlySalesTool
            .execute(
                serde_json::json!({ "startDate": "2026-02-01", "endDate": "2026-02-07" }),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(result["peak_hour"], 12);
        assert_eq!(result["hourly"].as_array().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_hourly_sales_rejects_bad_date() {
        let err = HourlySalesTool
            .execute(serde_json::json!({ "startDate": "last week", "endDate": "2026-02-07" }), &ctx())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("last week"));
    }
}
