//! Store error types

use thiserror::Error;

/// Errors raised by query parameter handling
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
}
