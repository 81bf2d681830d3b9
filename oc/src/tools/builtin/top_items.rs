//! getTopItems tool - best sellers by revenue or quantity

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use sellerstore::{DEFAULT_TOP_ITEMS_LIMIT, SortKey};

use super::{date_range_properties, parse_args};
use crate::tools::{Tool, ToolContext, ToolError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopItemsArgs {
    start_date: String,
    end_date: String,
    /// JSON number; fractional values are truncated
    limit: Option<f64>,
    sort_by: Option<SortKey>,
}

pub struct TopItemsTool;

#[async_trait]
impl Tool for TopItemsTool {
    fn name(&self) -> &'static str {
        "getTopItems"
    }

    fn description(&self) -> &'static str {
        "Get top-selling items by revenue or quantity for a date range."
    }

    fn input_schema(&self) -> Value {
        let mut props = date_range_properties();
        props.insert(
            "limit".to_string(),
            serde_json::json!({ "type": "number", "description": "Number of items to return (default 5)" }),
        );
        props.insert(
            "sortBy".to_string(),
            serde_json::json!({
                "type": "string",
                "enum": ["revenue", "qty"],
                "description": "Sort by revenue or quantity (default revenue)"
            }),
        );
        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": ["startDate", "endDate"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(request_id = %ctx.request_id, "TopItemsTool::execute: called");
        let args: TopItemsArgs = parse_args(args)?;
        let range = sellerstore::DateRange::parse(&args.start_date, &args.end_date)?;

        let limit = match args.limit {
            None => DEFAULT_TOP_ITEMS_LIMIT,
            Some(n) if n.is_finite() && n >= 0.0 => n.trunc() as usize,
            Some(n) => {
                return Err(ToolError::InvalidArgument(format!(
                    "limit must be a non-negative number, got {}",
                    n
                )));
            }
        };

        let sort_by = args.sort_by.unwrap_or_default();
        Ok(serde_json::to_value(ctx.store.top_items(&range, limit, sort_by))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::ctx;

    #[tokio::test]
    async fn test_top_items_defaults() {
        let result = TopItemsTool
            .execute(
                serde_json::json!({ "startDate": "2026-02-01", "endDate": "2026-02-07" }),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(result["sortedBy"], "revenue");
        assert_eq!(result["items"][0]["name"], "Latte");
        assert_eq!(result["items"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_top_items_by_qty_with_fractional_limit() {
        let result = TopItemsTool
            .execute(
                serde_json::json!({
                    "startDate": "2026-02-01",
                    "endDate": "2026-02-07",
                    "limit": 2.7,
                    "sortBy": "qty"
                }),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(result["sortedBy"], "qty");
        assert_eq!(result["items"].as_array().unwrap().len(), 2);
        assert_eq!(result["items"][1]["name"], "Croissant");
    }

    #[tokio::test]
    async fn test_top_items_rejects_unknown_sort_key() {
        let err = TopItemsTool
            .execute(
                serde_json::json!({ "startDate": "2026-02-01", "endDate": "2026-02-07", "sortBy": "margin" }),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_top_items_rejects_negative_limit() {
        let err = TopItemsTool
            .execute(
                serde_json::json!({ "startDate": "2026-02-01", "endDate": "2026-02-07", "limit": -1 }),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_schema_lists_sort_enum() {
        let schema = TopItemsTool.input_schema();
        assert_eq!(schema["properties"]["sortBy"]["enum"], serde_json::json!(["revenue", "qty"]));
        assert_eq!(schema["required"], serde_json::json!(["startDate", "endDate"]));
    }
}
