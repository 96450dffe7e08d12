use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Lab Report";
pub const DEFAULT_SUMMARY: &str = "Summary not available.";

/// A test result outside its expected range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AbnormalAlert {
    pub name: String,
    pub value: String,
    pub expected: String,
    pub unit: String,
}

/// A test result within its expected range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NormalResult {
    pub name: String,
    pub value: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_tests: u32,
    pub normal_tests: u32,
    pub abnormal_tests: u32,
    pub abnormal_alerts: Vec<AbnormalAlert>,
    pub normal_list: Vec<NormalResult>,
}

/// Report content before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub title: String,
    pub summary: String,
    pub metrics: Metrics,
    pub diet_recommendations: Vec<String>,
    pub exercise_recommendations: Vec<String>,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            summary: DEFAULT_SUMMARY.to_string(),
            metrics: Metrics::default(),
            diet_recommendations: Vec::new(),
            exercise_recommendations: Vec::new(),
        }
    }
}

/// A persisted report. Reports are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub metrics: Metrics,
    pub diet_recommendations: Vec<String>,
    pub exercise_recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn from_draft(id: i64, created_at: DateTime<Utc>, draft: ReportDraft) -> Self {
        Self {
            id,
            title: draft.title,
            summary: draft.summary,
            metrics: draft.metrics,
            diet_recommendations: draft.diet_recommendations,
            exercise_recommendations: draft.exercise_recommendations,
            created_at,
        }
    }

    /// The content fields without store-assigned identity.
    pub fn draft(&self) -> ReportDraft {
        ReportDraft {
            title: self.title.clone(),
            summary: self.summary.clone(),
            metrics: self.metrics.clone(),
            diet_recommendations: self.diet_recommendations.clone(),
            exercise_recommendations: self.exercise_recommendations.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_defaults() {
        let draft = ReportDraft::default();
        assert_eq!(draft.title, "Lab Report");
        assert_eq!(draft.summary, "Summary not available.");
        assert_eq!(draft.metrics, Metrics::default());
        assert!(draft.diet_recommendations.is_empty());
        assert!(draft.exercise_recommendations.is_empty());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let mut draft = ReportDraft::default();
        draft.metrics.total_tests = 2;
        draft.metrics.abnormal_alerts.push(AbnormalAlert {
            name: "LDL".into(),
            value: "160".into(),
            expected: "< 100".into(),
            unit: "mg/dL".into(),
        });
        let report = Report::from_draft(7, Utc::now(), draft);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["metrics"]["totalTests"], 2);
        assert_eq!(value["metrics"]["abnormalAlerts"][0]["expected"], "< 100");
        assert_eq!(value["metrics"]["normalList"], json!([]));
        assert_eq!(value["dietRecommendations"], json!([]));
        assert_eq!(value["exerciseRecommendations"], json!([]));
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn test_draft_recovers_content() {
        let mut draft = ReportDraft::default();
        draft.title = "CBC".into();
        draft.diet_recommendations.push("More fibre".into());
        let report = Report::from_draft(1, Utc::now(), draft.clone());
        assert_eq!(report.draft(), draft);
    }
}
