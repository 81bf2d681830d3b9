//! Built-in seller data tools

mod hourly_sales;
mod inventory_status;
mod neighborhood_context;
mod sales_summary;
mod staffing_signals;
mod top_items;

pub use hourly_sales::HourlySalesTool;
pub use inventory_status::InventoryStatusTool;
pub use neighborhood_context::NeighborhoodContextTool;
pub use sales_summary::SalesSummaryTool;
pub use staffing_signals::StaffingSignalsTool;
pub use top_items::TopItemsTool;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use sellerstore::DateRange;

use super::ToolError;

/// `startDate`/`endDate` pair shared by every dated tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RangeArgs {
    pub start_date: String,
    pub end_date: String,
}

impl RangeArgs {
    pub fn to_range(&self) -> Result<DateRange, ToolError> {
        Ok(DateRange::parse(&self.start_date, &self.end_date)?)
    }
}

/// Deserialize tool arguments, reporting serde's message as an invalid argument
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArgument(e.to_string()))
}

/// Parameter schema for tools that take only a date range
pub(crate) fn date_range_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": date_range_properties(),
        "required": ["startDate", "endDate"]
    })
}

pub(crate) fn date_range_properties() -> serde_json::Map<String, Value> {
    let mut props = serde_json::Map::new();
    props.insert(
        "startDate".to_string(),
        serde_json::json!({ "type": "string", "description": "Start date inclusive (YYYY-MM-DD)" }),
    );
    props.insert(
        "endDate".to_string(),
        serde_json::json!({ "type": "string", "description": "End date inclusive (YYYY-MM-DD)" }),
    );
    props
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use sellerstore::SellerStore;

    use crate::tools::ToolContext;

    pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../ss/fixtures");

    pub fn ctx() -> ToolContext {
        let store = SellerStore::open(FIXTURES).unwrap();
        ToolContext::new(Arc::new(store), "test-request")
    }
}
