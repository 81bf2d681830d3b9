//! ToolContext - execution context for tools

use std::sync::Arc;

use sellerstore::SellerStore;
use tracing::debug;

/// Execution context for tools - scoped to a single question
///
/// Holds the shared read-only store and the id of the request the calls
/// belong to, so every tool event can be correlated with its turn.
#[derive(Clone)]
pub struct ToolContext {
    /// Business data every tool reads from
    pub store: Arc<SellerStore>,

    /// Request this call belongs to
    pub request_id: String,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(store: Arc<SellerStore>, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        debug!(%request_id, "ToolContext::new: called");
        Self { store, request_id }
    }
}
