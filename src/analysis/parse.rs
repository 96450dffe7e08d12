//! Model answer -> `ReportDraft`.
//!
//! Every field is read independently and falls back to its default when it
//! is missing or has the wrong shape, so a bad `metrics` block never costs
//! the `title`. Answers that are not a JSON object at all fall back to
//! `ReportDraft::default()` wholesale.

use serde::Deserialize;
use serde_json::Value;
use crate::models::{AbnormalAlert, Metrics, NormalResult, ReportDraft, DEFAULT_SUMMARY, DEFAULT_TITLE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Empty,
    Malformed(String),
    NotAnObject,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Empty => f.write_str("empty response"),
            FallbackReason::Malformed(e) => write!(f, "malformed JSON: {}", e),
            FallbackReason::NotAnObject => f.write_str("response is not a JSON object"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(ReportDraft),
    Fallback(FallbackReason),
}

impl ParseOutcome {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return ParseOutcome::Fallback(FallbackReason::Empty);
        }

        let value = match locate_json(text) {
            Ok(v) => v,
            Err(e) => return ParseOutcome::Fallback(FallbackReason::Malformed(e)),
        };
        if !value.is_object() {
            return ParseOutcome::Fallback(FallbackReason::NotAnObject);
        }

        match serde_json::from_value::<RawInterpretation>(value) {
            Ok(raw) => ParseOutcome::Parsed(raw.into_draft()),
            Err(e) => ParseOutcome::Fallback(FallbackReason::Malformed(e.to_string())),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseOutcome::Fallback(_))
    }

    pub fn into_draft(self) -> ReportDraft {
        match self {
            ParseOutcome::Parsed(draft) => draft,
            ParseOutcome::Fallback(_) => ReportDraft::default(),
        }
    }
}

/// Direct parse, then a ```json fenced block, then the outermost braces.
fn locate_json(text: &str) -> Result<Value, String> {
    let direct_err = match serde_json::from_str::<Value>(text) {
        Ok(v) => return Ok(v),
        Err(e) => e.to_string(),
    };

    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end) = rest.rfind("```") {
            if let Ok(v) = serde_json::from_str::<Value>(rest[..end].trim()) {
                return Ok(v);
            }
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str::<Value>(&text[start..=end]) {
                return Ok(v);
            }
        }
    }

    Err(direct_err)
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawInterpretation {
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    summary: Option<String>,
    #[serde(deserialize_with = "lenient::object")]
    metrics: Option<RawMetrics>,
    #[serde(deserialize_with = "lenient::strings")]
    diet_recommendations: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    exercise_recommendations: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawMetrics {
    #[serde(deserialize_with = "lenient::count")]
    total_tests: u32,
    #[serde(deserialize_with = "lenient::count")]
    normal_tests: u32,
    #[serde(deserialize_with = "lenient::count")]
    abnormal_tests: u32,
    #[serde(deserialize_with = "lenient::items")]
    abnormal_alerts: Vec<RawAlert>,
    #[serde(deserialize_with = "lenient::items")]
    normal_list: Vec<RawNormal>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawAlert {
    #[serde(deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    value: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    expected: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    unit: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawNormal {
    #[serde(deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    value: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    unit: Option<String>,
}

impl RawInterpretation {
    fn into_draft(self) -> ReportDraft {
        ReportDraft {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            summary: self.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            metrics: self.metrics.map(RawMetrics::into_metrics).unwrap_or_default(),
            diet_recommendations: self.diet_recommendations,
            exercise_recommendations: self.exercise_recommendations,
        }
    }
}

impl RawMetrics {
    fn into_metrics(self) -> Metrics {
        Metrics {
            total_tests: self.total_tests,
            normal_tests: self.normal_tests,
            abnormal_tests: self.abnormal_tests,
            abnormal_alerts: self.abnormal_alerts.into_iter()
                .map(|a| AbnormalAlert {
                    name: a.name.unwrap_or_default(),
                    value: a.value.unwrap_or_default(),
                    expected: a.expected.unwrap_or_default(),
                    unit: a.unit.unwrap_or_default(),
                })
                .collect(),
            normal_list: self.normal_list.into_iter()
                .map(|n| NormalResult {
                    name: n.name.unwrap_or_default(),
                    value: n.value.unwrap_or_default(),
                    unit: n.unit.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn text_of(value: Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn count_of(value: &Value) -> u32 {
        match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    u.min(u32::MAX as u64) as u32
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => {
                            f.min(u32::MAX as f64) as u32
                        }
                        _ => 0,
                    }
                }
            }
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(text_of(Value::deserialize(d)?))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(count_of(&Value::deserialize(d)?))
    }

    /// String entries are kept as written, empty ones included.
    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Array elements that fit `T`; anything else is dropped.
    pub fn items<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(d)?;
        if !value.is_object() {
            return Ok(None);
        }
        Ok(serde_json::from_value(value).ok())
    }
}
