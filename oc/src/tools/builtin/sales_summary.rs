//! getSalesSummary tool - revenue, orders and AOV for a date range

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{RangeArgs, date_range_schema, parse_args};
use crate::tools::{Tool, ToolContext, ToolError};

pub struct SalesSummaryTool;

#[async_trait]
impl Tool for SalesSummaryTool {
    fn name(&self) -> &'static str {
        "getSalesSummary"
    }

    fn description(&self) -> &'static str {
        "Get total revenue, order count, and average order value for a date range."
    }

    fn input_schema(&self) -> Value {
        date_range_schema()
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(request_id = %ctx.request_id, "SalesSummaryTool::execute: called");
        let range = parse_args::<RangeArgs>(args)?.to_range()?;
        Ok(serde_json::to_value(ctx.store.sales_summary(&range))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::ctx;

    #[tokio::test]
    async fn test_sales_summary_tool() {
        let result = SalesSummaryTool
            .execute(
                serde_json::json!({ "startDate": "2026-02-01", "endDate": "2026-02-07" }),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(result["days"], 3);
        assert_eq!(result["order_count"], 230);
        assert_eq!(result["period"]["start"], "2026-02-01");
    }

    #[tokio::test]
    async fn test_sales_summary_empty_range_is_not_an_error() {
        let result = SalesSummaryTool
            .execute(
                serde_json::json!({ "startDate": "2025-01-01", "endDate": "2025-01-07" }),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(result["days"], 0);
        assert_eq!(result["note"], "No data found for this date range.");
    }

    #[tokio::test]
    async fn test_sales_summary_requires_dates() {
        let err = SalesSummaryTool.execute(serde_json::json!({}), &ctx()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }
}
