//! Structural validation of a parsed answer against the Copilot Output contract

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use super::schema::{
    ActionCard, Confidence, ContractEnum, CopilotOutput, MAX_ACTIONS, MAX_ANSWER_CHARS, MAX_ASSUMPTIONS,
    MAX_FOLLOWUPS, MAX_METRICS, MAX_WARNINGS, MIN_SOURCES, MetricCard, Source, SourceType, Trend,
};

/// Path reported for issues on the candidate itself
pub const ROOT_PATH: &str = "(root)";

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dot-joined path to the offending value, e.g. `metrics.0.label`
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Join issues as `path: message; path: message`
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Validate `candidate`, collecting every issue
///
/// Strings are trimmed before their length checks and the trimmed value is kept.
/// Absent optional arrays default to empty, explicit `null` is a type error and
/// unknown keys are dropped.
pub fn validate(candidate: &Value) -> Result<CopilotOutput, Vec<ValidationIssue>> {
    debug!("validate: called");
    let mut v = Validator::default();

    let Some(root) = v.object(Some(candidate)) else {
        return Err(v.issues);
    };

    let answer_markdown = v.field("answer_markdown", |v| v.string(root.get("answer_markdown"), Some(MAX_ANSWER_CHARS)));
    let metrics = v.field("metrics", |v| {
        v.array(root.get("metrics"), Absent::Empty, None, Some(MAX_METRICS), |v, item| v.metric(item))
    });
    let actions = v.field("actions", |v| {
        v.array(root.get("actions"), Absent::Empty, None, Some(MAX_ACTIONS), |v, item| v.action(item))
    });
    let sources = v.field("sources", |v| {
        v.array(root.get("sources"), Absent::Required, Some(MIN_SOURCES), None, |v, item| v.source(item))
    });
    let warnings = v.field("warnings", |v| {
        v.array(root.get("warnings"), Absent::Empty, None, Some(MAX_WARNINGS), |v, item| {
            v.string(item, None)
        })
    });
    let followups = v.field("followups", |v| {
        v.array(root.get("followups"), Absent::Empty, None, Some(MAX_FOLLOWUPS), |v, item| {
            v.string(item, None)
        })
    });

    if !v.issues.is_empty() {
        debug!(issue_count = %v.issues.len(), "validate: rejected");
        return Err(v.issues);
    }

    match (answer_markdown, metrics, actions, sources, warnings, followups) {
        (Some(answer_markdown), Some(metrics), Some(actions), Some(sources), Some(warnings), Some(followups)) => {
            Ok(CopilotOutput {
                answer_markdown,
                metrics,
                actions,
                sources,
                warnings,
                followups,
            })
        }
        _ => Err(vec![ValidationIssue {
            path: ROOT_PATH.to_string(),
            message: "Invalid output".to_string(),
        }]),
    }
}

/// What an absent array becomes
#[derive(Clone, Copy)]
enum Absent {
    Empty,
    Required,
}

#[derive(Default)]
struct Validator {
    path: Vec<String>,
    issues: Vec<ValidationIssue>,
}

impl Validator {
    fn issue(&mut self, message: impl Into<String>) {
        let path = if self.path.is_empty() {
            ROOT_PATH.to_string()
        } else {
            self.path.join(".")
        };
        self.issues.push(ValidationIssue {
            path,
            message: message.into(),
        });
    }

    /// Run `check` with `segment` appended to the current path
    fn field<T>(&mut self, segment: impl ToString, check: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.path.push(segment.to_string());
        let result = check(self);
        self.path.pop();
        result
    }

    fn type_issue(&mut self, expected: &str, value: Option<&Value>) {
        match value {
            None => self.issue("Required"),
            Some(v) => self.issue(format!("Expected {}, received {}", expected, kind(v))),
        }
    }

    fn object<'a>(&mut self, value: Option<&'a Value>) -> Option<&'a Map<String, Value>> {
        match value {
            Some(Value::Object(map)) => Some(map),
            other => {
                self.type_issue("object", other);
                None
            }
        }
    }

    /// Required string, trimmed, at least one character, at most `max`
    ///
    /// Lengths are UTF-16 code units, the unit browser clients measure in.
    fn string(&mut self, value: Option<&Value>, max: Option<usize>) -> Option<String> {
        let Some(Value::String(s)) = value else {
            self.type_issue("string", value);
            return None;
        };

        let trimmed = s.trim();
        let len = trimmed.encode_utf16().count();
        let mut ok = true;
        if len < 1 {
            self.issue("String must contain at least 1 character(s)");
            ok = false;
        }
        if let Some(max) = max.filter(|max| len > *max) {
            self.issue(format!("String must contain at most {} character(s)", max));
            ok = false;
        }
        ok.then(|| trimmed.to_string())
    }

    /// Optional string: absent is fine, anything present must pass `string`
    fn optional_string(&mut self, value: Option<&Value>) -> Option<Option<String>> {
        match value {
            None => Some(None),
            Some(_) => self.string(value, None).map(Some),
        }
    }

    fn enumeration<E: ContractEnum>(&mut self, value: Option<&Value>) -> Option<E> {
        let Some(Value::String(s)) = value else {
            self.type_issue(&expected_variants::<E>(), value);
            return None;
        };

        match E::from_name(s) {
            Some(e) => Some(e),
            None => {
                self.issue(format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    expected_variants::<E>(),
                    s
                ));
                None
            }
        }
    }

    fn optional_enumeration<E: ContractEnum>(&mut self, value: Option<&Value>) -> Option<Option<E>> {
        match value {
            None => Some(None),
            Some(_) => self.enumeration(value).map(Some),
        }
    }

    /// Array with length bounds; every element is checked even when a bound fails
    fn array<T>(
        &mut self,
        value: Option<&Value>,
        absent: Absent,
        min: Option<usize>,
        max: Option<usize>,
        mut item: impl FnMut(&mut Self, Option<&Value>) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = match (value, absent) {
            (None, Absent::Empty) => return Some(Vec::new()),
            (Some(Value::Array(items)), _) => items,
            (other, _) => {
                self.type_issue("array", other);
                return None;
            }
        };

        let mut ok = true;
        if let Some(min) = min.filter(|min| items.len() < *min) {
            self.issue(format!("Array must contain at least {} element(s)", min));
            ok = false;
        }
        if let Some(max) = max.filter(|max| items.len() > *max) {
            self.issue(format!("Array must contain at most {} element(s)", max));
            ok = false;
        }

        let mut out = Vec::with_capacity(items.len());
        for (i, element) in items.iter().enumerate() {
            match self.field(i, |v| item(v, Some(element))) {
                Some(parsed) => out.push(parsed),
                None => ok = false,
            }
        }

        ok.then_some(out)
    }

    fn metric(&mut self, value: Option<&Value>) -> Option<MetricCard> {
        let map = self.object(value)?;
        let label = self.field("label", |v| v.string(map.get("label"), None));
        let value = self.field("value", |v| v.string(map.get("value"), None));
        let unit = self.field("unit", |v| v.optional_string(map.get("unit")));
        let trend = self.field("trend", |v| v.optional_enumeration::<Trend>(map.get("trend")));
        let delta = self.field("delta", |v| v.optional_string(map.get("delta")));
        let note = self.field("note", |v| v.optional_string(map.get("note")));

        Some(MetricCard {
            label: label?,
            value: value?,
            unit: unit?,
            trend: trend?,
            delta: delta?,
            note: note?,
        })
    }

    fn action(&mut self, value: Option<&Value>) -> Option<ActionCard> {
        let map = self.object(value)?;
        let title = self.field("title", |v| v.string(map.get("title"), None));
        let rationale = self.field("rationale", |v| v.string(map.get("rationale"), None));
        let expected_impact = self.field("expected_impact", |v| v.string(map.get("expected_impact"), None));
        let confidence = self.field("confidence", |v| v.enumeration::<Confidence>(map.get("confidence")));
        let assumptions = self.field("assumptions", |v| {
            v.array(map.get("assumptions"), Absent::Empty, None, Some(MAX_ASSUMPTIONS), |v, item| {
                v.string(item, None)
            })
        });

        Some(ActionCard {
            title: title?,
            rationale: rationale?,
            expected_impact: expected_impact?,
            confidence: confidence?,
            assumptions: assumptions?,
        })
    }

    fn source(&mut self, value: Option<&Value>) -> Option<Source> {
        let map = self.object(value)?;
        let kind = self.field("type", |v| v.enumeration::<SourceType>(map.get("type")));
        let detail = self.field("detail", |v| v.string(map.get("detail"), None));

        Some(Source {
            kind: kind?,
            detail: detail?,
        })
    }
}

fn expected_variants<E: ContractEnum>() -> String {
    E::VARIANTS
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Invoked tools that no source detail mentions, in invocation order
///
/// Matching is a case-insensitive substring test of the tool name against each
/// source's `detail`.
pub fn check_source_coverage(output: &CopilotOutput, invoked_tools: &[String]) -> Result<(), Vec<String>> {
    debug!(invoked = %invoked_tools.len(), sources = %output.sources.len(), "check_source_coverage: called");
    let details: Vec<String> = output.sources.iter().map(|s| s.detail.to_lowercase()).collect();

    let mut missing: Vec<String> = Vec::new();
    for tool in invoked_tools {
        let needle = tool.to_lowercase();
        if !details.iter().any(|d| d.contains(&needle)) && !missing.contains(tool) {
            missing.push(tool.clone());
        }
    }

    if missing.is_empty() { Ok(()) } else { Err(missing) }
}
