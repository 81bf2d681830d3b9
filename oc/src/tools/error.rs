//! Tool error types

use sellerstore::StoreError;
use thiserror::Error;

/// Errors a tool handler can report back to the model
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
