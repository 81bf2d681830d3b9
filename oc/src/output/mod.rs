//! The Copilot Output contract: types and validation

mod schema;
mod validate;

pub use schema::{
    ActionCard, Confidence, ContractEnum, CopilotOutput, MAX_ACTIONS, MAX_ANSWER_CHARS, MAX_ASSUMPTIONS,
    MAX_FOLLOWUPS, MAX_METRICS, MAX_WARNINGS, MIN_SOURCES, MetricCard, Source, SourceType, Trend,
};
pub use validate::{ROOT_PATH, ValidationIssue, check_source_coverage, format_issues, validate};
