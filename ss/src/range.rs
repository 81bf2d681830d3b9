//! Inclusive date ranges used by every dated query

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::StoreError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two dates, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StoreError> {
        if start > end {
            debug!(%start, %end, "DateRange::new: inverted range");
            return Err(StoreError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, StoreError> {
        debug!(%start, %end, "DateRange::parse: called");
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Whether `date` falls inside the range (both bounds inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| StoreError::InvalidDate {
        value: value.to_string(),
    })
}
