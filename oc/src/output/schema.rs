//! Copilot Output types and their size limits

use serde::{Deserialize, Serialize};

/// Maximum characters in `answer_markdown`, after trimming
pub const MAX_ANSWER_CHARS: usize = 2500;
pub const MAX_METRICS: usize = 6;
pub const MAX_ACTIONS: usize = 3;
pub const MIN_SOURCES: usize = 1;
pub const MAX_WARNINGS: usize = 10;
pub const MAX_FOLLOWUPS: usize = 3;
pub const MAX_ASSUMPTIONS: usize = 8;

/// A validated final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopilotOutput {
    pub answer_markdown: String,
    pub metrics: Vec<MetricCard>,
    pub actions: Vec<ActionCard>,
    pub sources: Vec<Source>,
    pub warnings: Vec<String>,
    pub followups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCard {
    pub title: String,
    pub rationale: String,
    pub expected_impact: String,
    pub confidence: Confidence,
    pub assumptions: Vec<String>,
}

/// Where a claim in the answer came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceType,
    pub detail: String,
}

/// Closed string enums in the contract
pub trait ContractEnum: Sized + Copy {
    const VARIANTS: &'static [&'static str];

    fn from_name(name: &str) -> Option<Self>;
}

macro_rules! contract_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl ContractEnum for $name {
            const VARIANTS: &'static [&'static str] = &[$($text),+];

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

contract_enum!(
    /// Direction of a metric
    Trend { Up => "up", Down => "down", Flat => "flat" }
);

contract_enum!(
    /// How sure the model is about an action
    Confidence { Low => "low", Med => "med", High => "high" }
);

contract_enum!(
    /// `table` for internal data tools, `context` for neighborhood signals, `rule` for heuristics
    SourceType { Table => "table", Context => "context", Rule => "rule" }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_names() {
        assert_eq!(Trend::from_name("up"), Some(Trend::Up));
        assert_eq!(Confidence::from_name("med"), Some(Confidence::Med));
        assert_eq!(Confidence::from_name("medium"), None);
        assert_eq!(SourceType::VARIANTS, &["table", "context", "rule"]);
    }

    #[test]
    fn test_source_serializes_type_key() {
        let source = Source {
            kind: SourceType::Table,
            detail: "getSalesSummary 2026-02-01..2026-02-07".to_string(),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "table");
    }

    #[test]
    fn test_metric_omits_absent_optionals() {
        let metric = MetricCard {
            label: "Revenue".to_string(),
            value: "$1,220.25".to_string(),
            unit: None,
            trend: Some(Trend::Up),
            delta: None,
            note: None,
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["trend"], "up");
        assert!(json.get("unit").is_none());
        assert!(json.get("note").is_none());
    }
}
