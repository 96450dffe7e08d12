use tracing::info;
use crate::errors::LabsightError;
use crate::models::{AbnormalAlert, Metrics, NormalResult, Report, ReportDraft};
use super::Database;

fn normal(name: &str, value: &str, unit: &str) -> NormalResult {
    NormalResult { name: name.into(), value: value.into(), unit: unit.into() }
}

fn alert(name: &str, value: &str, expected: &str, unit: &str) -> AbnormalAlert {
    AbnormalAlert {
        name: name.into(),
        value: value.into(),
        expected: expected.into(),
        unit: unit.into(),
    }
}

pub fn sample_report() -> ReportDraft {
    ReportDraft {
        title: "Complete Blood Count & Lipids".into(),
        summary: "Your report looks mostly healthy. Blood count is within the normal range, \
                  but cholesterol levels are slightly elevated."
            .into(),
        metrics: Metrics {
            total_tests: 8,
            normal_tests: 6,
            abnormal_tests: 2,
            abnormal_alerts: vec![
                alert("LDL Cholesterol", "160", "< 100", "mg/dL"),
                alert("Triglycerides", "155", "< 150", "mg/dL"),
            ],
            normal_list: vec![
                normal("Hemoglobin", "14.5", "g/dL"),
                normal("WBC Count", "6.2", "10^3/uL"),
                normal("Platelets", "250", "10^3/uL"),
                normal("HDL Cholesterol", "45", "mg/dL"),
                normal("Fasting Blood Sugar", "85", "mg/dL"),
                normal("Vitamin D", "35", "ng/mL"),
            ],
        },
        diet_recommendations: vec![
            "Add more fibre: oats and methi (fenugreek)".into(),
            "Cut saturated fats: limit ghee and fried snacks".into(),
            "A glass of karela juice in the morning".into(),
        ],
        exercise_recommendations: vec![
            "30 minutes of brisk walking every day".into(),
            "Bhujangasana (Cobra Pose) for core strength and digestion".into(),
            "Surya Namaskar (Sun Salutation) rounds".into(),
        ],
    }
}

/// Insert the sample report when the store is empty. Returns the created
/// report, or `None` if the store already had rows.
pub fn seed_if_empty(db: &Database) -> Result<Option<Report>, LabsightError> {
    if db.count_reports()? > 0 {
        return Ok(None);
    }
    let report = db.create_report(&sample_report())?;
    info!(id = report.id, "Seeded sample report");
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_empty_database() {
        let db = Database::in_memory().unwrap();
        let seeded = seed_if_empty(&db).unwrap().unwrap();
        assert_eq!(seeded.title, "Complete Blood Count & Lipids");
        assert_eq!(db.count_reports().unwrap(), 1);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::in_memory().unwrap();
        seed_if_empty(&db).unwrap();
        assert!(seed_if_empty(&db).unwrap().is_none());
        assert_eq!(db.count_reports().unwrap(), 1);
    }

    #[test]
    fn test_seed_skips_populated_database() {
        let db = Database::in_memory().unwrap();
        db.create_report(&ReportDraft::default()).unwrap();
        assert!(seed_if_empty(&db).unwrap().is_none());
        assert_eq!(db.list_reports().unwrap()[0].title, "Lab Report");
    }

    #[test]
    fn test_sample_counts_match_lists() {
        let sample = sample_report();
        let m = &sample.metrics;
        assert_eq!(m.abnormal_tests as usize, m.abnormal_alerts.len());
        assert_eq!(m.normal_tests as usize, m.normal_list.len());
        assert_eq!(m.total_tests, m.normal_tests + m.abnormal_tests);
    }
}
