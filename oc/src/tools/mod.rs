//! Tool Registry - the fixed catalogue of seller data queries
//!
//! The registry is built once at startup and shared read-only. It decides which
//! tools the model may see for a turn and turns every handler outcome (including
//! unknown names and bad arguments) into a JSON value the model can read.

pub mod builtin;
mod context;
mod error;
mod registry;
mod traits;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::{ToolRegistry, parse_arguments};
pub use traits::Tool;
