//! Fixture record types, as written by the data generator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Records carrying a calendar date, filterable by `DateRange`
pub(crate) trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Revenue and orders for one hour of one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub hour: u32,
    pub revenue: f64,
    pub orders: u64,
}

/// Units and revenue for one menu item on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    pub category: String,
    pub qty: u64,
    pub revenue: f64,
}

/// One day of sales
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub total_revenue: f64,
    pub order_count: u64,
    pub avg_order_value: f64,
    #[serde(default)]
    pub hourly: Vec<HourlyEntry>,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

/// Current stock of one tracked ingredient or supply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item: String,
    pub category: String,
    pub current_stock: f64,
    pub unit: String,
    pub reorder_point: f64,
    pub daily_usage: f64,
    #[serde(default)]
    pub status: String,
}

/// A staffed shift, times as `HH:MM`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffShift {
    pub shift: String,
    pub start: String,
    pub end: String,
    pub staff_count: u32,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl StaffShift {
    /// Whether `hour` falls inside `[start, end)`
    pub fn covers(&self, hour: u32) -> bool {
        match (leading_hour(&self.start), leading_hour(&self.end)) {
            (Some(start), Some(end)) => hour >= start && hour < end,
            _ => false,
        }
    }
}

fn leading_hour(time: &str) -> Option<u32> {
    time.split(':').next()?.trim().parse().ok()
}

/// Staffing plan and observed peak for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub shifts: Vec<StaffShift>,
    pub peak_hour: u32,
    pub peak_hour_orders: u64,
    pub total_labor_hours: f64,
}

/// Weather observation or forecast for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub high_f: f64,
    pub low_f: f64,
    pub condition: String,
    pub precip_pct: f64,
}

impl WeatherDay {
    pub fn is_rainy(&self) -> bool {
        self.condition == "Rain" || self.condition == "Light Rain"
    }
}

/// A nearby event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub date: NaiveDate,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub expected_attendance: u64,
    pub distance_miles: f64,
}

/// A customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub date: NaiveDate,
    pub source: String,
    pub rating: f64,
    pub snippet: String,
    pub sentiment: String,
}

macro_rules! impl_dated {
    ($($ty:ty),*) => {
        $(impl Dated for $ty {
            fn date(&self) -> NaiveDate {
                self.date
            }
        })*
    };
}

impl_dated!(SalesDay, StaffingDay, WeatherDay, EventEntry, ReviewEntry);

/// Everything a store holds, one field per fixture file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    pub sales: Vec<SalesDay>,
    pub inventory: Vec<InventoryItem>,
    pub staffing: Vec<StaffingDay>,
    pub weather: Vec<WeatherDay>,
    pub events: Vec<EventEntry>,
    pub reviews: Vec<ReviewEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(start: &str, end: &str) -> StaffShift {
        StaffShift {
            shift: "morning".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            staff_count: 3,
            roles: vec![],
        }
    }

    #[test]
    fn test_shift_covers_start_not_end() {
        let s = shift("06:00", "12:00");
        assert!(s.covers(6));
        assert!(s.covers(11));
        assert!(!s.covers(12));
        assert!(!s.covers(5));
    }

    #[test]
    fn test_shift_with_unparseable_times_covers_nothing() {
        let s = shift("morning", "noon");
        assert!(!s.covers(8));
    }

    #[test]
    fn test_event_type_field_renamed() {
        let json = r#"{"date":"2026-01-10","name":"Farmers Market","type":"market","expected_attendance":500,"distance_miles":0.3}"#;
        let event: EventEntry = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "market");

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["type"], "market");
    }
}
