//! Core SellerStore implementation

use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::records::{Dated, StoreData};
use crate::DateRange;

/// Fixture file names, one per `StoreData` field
pub(crate) const SALES_FILE: &str = "sales.json";
pub(crate) const INVENTORY_FILE: &str = "inventory.json";
pub(crate) const STAFFING_FILE: &str = "staffing.json";
pub(crate) const WEATHER_FILE: &str = "weather.json";
pub(crate) const EVENTS_FILE: &str = "events.json";
pub(crate) const REVIEWS_FILE: &str = "reviews.json";

/// Immutable, in-memory view of the seller's business data
#[derive(Debug, Clone)]
pub struct SellerStore {
    pub(crate) data: StoreData,
    source: Option<PathBuf>,
}

impl SellerStore {
    /// Load every fixture file from `dir`
    ///
    /// All six files are required; the error names the file that failed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        debug!(?dir, "SellerStore::open: called");

        let data = StoreData {
            sales: load_file(dir, SALES_FILE)?,
            inventory: load_file(dir, INVENTORY_FILE)?,
            staffing: load_file(dir, STAFFING_FILE)?,
            weather: load_file(dir, WEATHER_FILE)?,
            events: load_file(dir, EVENTS_FILE)?,
            reviews: load_file(dir, REVIEWS_FILE)?,
        };

        info!(
            dir = %dir.display(),
            sales_days = data.sales.len(),
            inventory_items = data.inventory.len(),
            staffing_days = data.staffing.len(),
            "Loaded seller data"
        );

        Ok(Self {
            data,
            source: Some(dir.to_path_buf()),
        })
    }

    /// Build a store from records already in memory
    pub fn from_parts(data: StoreData) -> Self {
        debug!(sales_days = data.sales.len(), "SellerStore::from_parts: called");
        Self { data, source: None }
    }

    /// Directory the store was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Raw records
    pub fn data(&self) -> &StoreData {
        &self.data
    }
}

fn load_file<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(name);
    let content = fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
    let records: Vec<T> = serde_json::from_str(&content).context(format!("Failed to parse {}", name))?;
    debug!(%name, count = records.len(), "load_file: parsed");
    Ok(records)
}

/// Records of `items` whose date falls inside `range`, in file order
pub(crate) fn in_range<'a, T: Dated>(items: &'a [T], range: &DateRange) -> Vec<&'a T> {
    items.iter().filter(|item| range.contains(item.date())).collect()
}
