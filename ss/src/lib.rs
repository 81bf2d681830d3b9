//! SellerStore - read-only seller business data
//!
//! Loads a fixed set of JSON fixtures once (sales, inventory, staffing and the
//! neighborhood signals: weather, events, reviews) and answers aggregate queries
//! over them. Loaded data never changes, so a store can be shared behind an `Arc`
//! and read concurrently without locking.
//!
//! # Layout
//!
//! ```text
//! data/
//! ├── sales.json       # one record per day, with hourly and per-item breakdowns
//! ├── inventory.json   # current stock snapshot
//! ├── staffing.json    # shifts and peak-hour traffic per day
//! ├── weather.json
//! ├── events.json
//! └── reviews.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sellerstore::{DateRange, SellerStore};
//!
//! let store = SellerStore::open("data")?;
//! let range = DateRange::parse("2026-01-30", "2026-02-05")?;
//! let summary = store.sales_summary(&range);
//! println!("{} orders", summary.order_count);
//! ```

pub mod cli;
mod error;
mod queries;
mod range;
mod records;
mod store;

pub use error::StoreError;
pub use queries::{
    EventSummary, HourBucket, HourlySales, InventoryLevel, InventoryStatus, ItemTotal, NeighborhoodContext, Period,
    ReviewSummary, SalesSummary, SentimentBreakdown, SortKey, StaffSignal, StaffingAssessment, StaffingSignals,
    StockStatus, TopItems, WeatherSummary,
};
pub use range::DateRange;
pub use records::{
    EventEntry, HourlyEntry, InventoryItem, ItemEntry, ReviewEntry, SalesDay, StaffShift, StaffingDay, StoreData,
    WeatherDay,
};
pub use store::SellerStore;

/// Default fixture directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default number of items returned by `top_items`
pub const DEFAULT_TOP_ITEMS_LIMIT: usize = 5;

/// Round to cents, the precision every money and ratio figure is reported in
pub(crate) fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
