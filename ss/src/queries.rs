//! Aggregate queries over the loaded records
//!
//! Every query is pure: it reads the immutable store and returns a serializable
//! aggregate. Empty ranges are not errors; they produce zeroed aggregates (with a
//! `note` where a caller would otherwise misread zeros as real data).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::records::{EventEntry, ReviewEntry, WeatherDay};
use crate::store::in_range;
use crate::{DateRange, SellerStore, round2};

/// First and last hour of the trading day reported by `hourly_sales`
const FIRST_HOUR: u32 = 6;
const LAST_HOUR: u32 = 21;

/// Orders per staff member at peak above which a day is understaffed
const UNDERSTAFFED_ORDERS_PER_STAFF: f64 = 10.0;

/// Orders per staff member at peak below which a day is overstaffed
const OVERSTAFFED_ORDERS_PER_STAFF: f64 = 5.0;

/// The range a result was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<&DateRange> for Period {
    fn from(range: &DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub period: Period,
    pub days: usize,
    pub total_revenue: f64,
    pub order_count: u64,
    pub avg_order_value: f64,
    pub daily_avg_revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourBucket {
    pub hour: u32,
    pub total_revenue: f64,
    pub total_orders: u64,
    pub avg_revenue: f64,
    pub avg_orders: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlySales {
    pub period: Period,
    pub days: usize,
    pub hourly: Vec<HourBucket>,
    pub peak_hour: u32,
    pub peak_avg_orders: f64,
    pub peak_avg_revenue: f64,
}

/// Ranking key for `top_items`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Revenue,
    Qty,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemTotal {
    pub name: String,
    pub category: String,
    pub qty: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopItems {
    pub period: Period,
    pub days: usize,
    #[serde(rename = "sortedBy")]
    pub sorted_by: SortKey,
    pub items: Vec<ItemTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Low,
    Ok,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryLevel {
    pub item: String,
    pub category: String,
    pub current_stock: f64,
    pub unit: String,
    pub reorder_point: f64,
    pub daily_usage: f64,
    pub status: StockStatus,
    pub days_until_stockout: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryStatus {
    pub total_items: usize,
    pub low_stock_count: usize,
    pub items: Vec<InventoryLevel>,
    pub low_stock_alerts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffingAssessment {
    Understaffed,
    Adequate,
    Overstaffed,
}

impl StaffingAssessment {
    fn from_orders_per_staff(ratio: f64) -> Self {
        if ratio > UNDERSTAFFED_ORDERS_PER_STAFF {
            Self::Understaffed
        } else if ratio < OVERSTAFFED_ORDERS_PER_STAFF {
            Self::Overstaffed
        } else {
            Self::Adequate
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffSignal {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub peak_hour: u32,
    pub peak_orders: u64,
    pub staff_at_peak: u32,
    pub orders_per_staff: f64,
    pub assessment: StaffingAssessment,
    pub total_labor_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffingSignals {
    pub period: Period,
    pub days: usize,
    pub understaffed_days: usize,
    pub signals: Vec<StaffSignal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherSummary {
    pub days: usize,
    pub rainy_days: usize,
    pub avg_high_f: Option<f64>,
    pub daily: Vec<WeatherDay>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub count: usize,
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub count: usize,
    pub avg_rating: Option<f64>,
    pub sentiment: SentimentBreakdown,
    pub reviews: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodContext {
    pub period: Period,
    pub weather: WeatherSummary,
    pub events: EventSummary,
    pub reviews: ReviewSummary,
}

impl SellerStore {
    /// Revenue, order count and average order value across the range
    pub fn sales_summary(&self, range: &DateRange) -> SalesSummary {
        debug!(?range, "SellerStore::sales_summary: called");
        let days = in_range(&self.data.sales, range);

        if days.is_empty() {
            debug!("SellerStore::sales_summary: no days in range");
            return SalesSummary {
                period: range.into(),
                days: 0,
                total_revenue: 0.0,
                order_count: 0,
                avg_order_value: 0.0,
                daily_avg_revenue: 0.0,
                note: Some("No data found for this date range.".to_string()),
            };
        }

        let total_revenue = round2(days.iter().map(|d| d.total_revenue).sum());
        let order_count: u64 = days.iter().map(|d| d.order_count).sum();
        let avg_order_value = if order_count > 0 {
            round2(total_revenue / order_count as f64)
        } else {
            0.0
        };

        SalesSummary {
            period: range.into(),
            days: days.len(),
            total_revenue,
            order_count,
            avg_order_value,
            daily_avg_revenue: round2(total_revenue / days.len() as f64),
            note: None,
        }
    }

    /// Revenue and orders per trading hour, summed and averaged across the range
    pub fn hourly_sales(&self, range: &DateRange) -> HourlySales {
        debug!(?range, "SellerStore::hourly_sales: called");
        let days = in_range(&self.data.sales, range);
        let divisor = days.len().max(1) as f64;

        let mut totals: Vec<(f64, u64)> = vec![(0.0, 0); (LAST_HOUR - FIRST_HOUR + 1) as usize];
        for day in &days {
            for entry in &day.hourly {
                if (FIRST_HOUR..=LAST_HOUR).contains(&entry.hour) {
                    let slot = &mut totals[(entry.hour - FIRST_HOUR) as usize];
                    slot.0 += entry.revenue;
                    slot.1 += entry.orders;
                }
            }
        }

        let hourly: Vec<HourBucket> = totals
            .into_iter()
            .zip(FIRST_HOUR..=LAST_HOUR)
            .map(|((revenue, orders), hour)| HourBucket {
                hour,
                total_revenue: round2(revenue),
                total_orders: orders,
                avg_revenue: round2(revenue / divisor),
                avg_orders: round2(orders as f64 / divisor),
            })
            .collect();

        // Earliest hour wins ties
        let peak = hourly
            .iter()
            .fold(None::<&HourBucket>, |best, h| match best {
                Some(b) if h.total_orders <= b.total_orders => Some(b),
                _ => Some(h),
            });

        let (peak_hour, peak_avg_orders, peak_avg_revenue) = peak
            .map(|p| (p.hour, p.avg_orders, p.avg_revenue))
            .unwrap_or((FIRST_HOUR, 0.0, 0.0));

        HourlySales {
            period: range.into(),
            days: days.len(),
            hourly,
            peak_hour,
            peak_avg_orders,
            peak_avg_revenue,
        }
    }

    /// Best-selling items across the range, by revenue or by quantity
    pub fn top_items(&self, range: &DateRange, limit: usize, sort_by: SortKey) -> TopItems {
        debug!(?range, %limit, ?sort_by, "SellerStore::top_items: called");
        let days = in_range(&self.data.sales, range);

        // Keep first-seen order so equal keys rank stably
        let mut totals: Vec<ItemTotal> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for day in &days {
            for entry in &day.items {
                let slot = *index.entry(entry.name.as_str()).or_insert_with(|| {
                    totals.push(ItemTotal {
                        name: entry.name.clone(),
                        category: entry.category.clone(),
                        qty: 0,
                        revenue: 0.0,
                    });
                    totals.len() - 1
                });
                totals[slot].qty += entry.qty;
                totals[slot].revenue += entry.revenue;
            }
        }

        for item in &mut totals {
            item.revenue = round2(item.revenue);
        }

        match sort_by {
            SortKey::Revenue => totals.sort_by(|a, b| b.revenue.total_cmp(&a.revenue)),
            SortKey::Qty => totals.sort_by(|a, b| b.qty.cmp(&a.qty)),
        }
        totals.truncate(limit);

        TopItems {
            period: range.into(),
            days: days.len(),
            sorted_by: sort_by,
            items: totals,
        }
    }

    /// Current stock with low-stock flags and days-until-stockout estimates
    pub fn inventory_status(&self) -> InventoryStatus {
        debug!("SellerStore::inventory_status: called");
        let items: Vec<InventoryLevel> = self
            .data
            .inventory
            .iter()
            .map(|inv| InventoryLevel {
                item: inv.item.clone(),
                category: inv.category.clone(),
                current_stock: inv.current_stock,
                unit: inv.unit.clone(),
                reorder_point: inv.reorder_point,
                daily_usage: inv.daily_usage,
                status: if inv.current_stock <= inv.reorder_point {
                    StockStatus::Low
                } else {
                    StockStatus::Ok
                },
                days_until_stockout: (inv.daily_usage > 0.0).then(|| round2(inv.current_stock / inv.daily_usage)),
            })
            .collect();

        let low_stock_alerts: Vec<String> = items
            .iter()
            .filter(|i| i.status == StockStatus::Low)
            .map(|i| match i.days_until_stockout {
                Some(days) => format!("{}: {} {} remaining (~{} days)", i.item, i.current_stock, i.unit, days),
                None => format!("{}: {} {} remaining", i.item, i.current_stock, i.unit),
            })
            .collect();

        InventoryStatus {
            total_items: items.len(),
            low_stock_count: low_stock_alerts.len(),
            items,
            low_stock_alerts,
        }
    }

    /// Peak-hour staffing coverage per day
    pub fn staffing_signals(&self, range: &DateRange) -> StaffingSignals {
        debug!(?range, "SellerStore::staffing_signals: called");
        let days = in_range(&self.data.staffing, range);

        if days.is_empty() {
            debug!("SellerStore::staffing_signals: no days in range");
            return StaffingSignals {
                period: range.into(),
                days: 0,
                understaffed_days: 0,
                signals: vec![],
                summary: None,
                note: Some("No staffing data found for this date range.".to_string()),
            };
        }

        let signals: Vec<StaffSignal> = days
            .iter()
            .map(|day| {
                let staff_at_peak = day
                    .shifts
                    .iter()
                    .find(|s| s.covers(day.peak_hour))
                    .map(|s| s.staff_count)
                    .unwrap_or(1)
                    .max(1);
                let orders_per_staff = round2(day.peak_hour_orders as f64 / staff_at_peak as f64);

                StaffSignal {
                    date: day.date,
                    day_of_week: day.day_of_week.clone(),
                    peak_hour: day.peak_hour,
                    peak_orders: day.peak_hour_orders,
                    staff_at_peak,
                    orders_per_staff,
                    assessment: StaffingAssessment::from_orders_per_staff(orders_per_staff),
                    total_labor_hours: day.total_labor_hours,
                }
            })
            .collect();

        let understaffed_days = signals
            .iter()
            .filter(|s| s.assessment == StaffingAssessment::Understaffed)
            .count();

        let summary = if understaffed_days > 0 {
            format!(
                "{} of {} days show potential understaffing during peak hours.",
                understaffed_days,
                days.len()
            )
        } else {
            "Staffing appears adequate for all peak periods.".to_string()
        };

        StaffingSignals {
            period: range.into(),
            days: days.len(),
            understaffed_days,
            signals,
            summary: Some(summary),
            note: None,
        }
    }

    /// Weather, nearby events and review sentiment across the range
    pub fn neighborhood_context(&self, range: &DateRange) -> NeighborhoodContext {
        debug!(?range, "SellerStore::neighborhood_context: called");
        let weather: Vec<WeatherDay> = in_range(&self.data.weather, range).into_iter().cloned().collect();
        let events: Vec<EventEntry> = in_range(&self.data.events, range).into_iter().cloned().collect();
        let reviews: Vec<ReviewEntry> = in_range(&self.data.reviews, range).into_iter().cloned().collect();

        let avg_high_f = mean(weather.iter().map(|w| w.high_f));
        let avg_rating = mean(reviews.iter().map(|r| r.rating));

        let mut sentiment = SentimentBreakdown::default();
        for review in &reviews {
            match review.sentiment.as_str() {
                "positive" => sentiment.positive += 1,
                "neutral" => sentiment.neutral += 1,
                "negative" => sentiment.negative += 1,
                other => debug!(%other, "SellerStore::neighborhood_context: unrecognised sentiment"),
            }
        }

        NeighborhoodContext {
            period: range.into(),
            weather: WeatherSummary {
                days: weather.len(),
                rainy_days: weather.iter().filter(|w| w.is_rainy()).count(),
                avg_high_f,
                daily: weather,
            },
            events: EventSummary {
                count: events.len(),
                events,
            },
            reviews: ReviewSummary {
                count: reviews.len(),
                avg_rating,
                sentiment,
                reviews,
            },
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| round2(sum / count as f64))
}
