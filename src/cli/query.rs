use crate::cli::commands::{ListArgs, ShowArgs};
use crate::db::Database;
use crate::errors::LabsightError;
use crate::models::Report;
use tracing::info;

pub async fn handle_list(args: ListArgs, config_path: Option<&str>) -> Result<(), LabsightError> {
    let config = super::load_with_db(config_path, args.db.as_deref()).await?;
    let db = Database::new(&config.database.path)?;
    let reports = db.list_reports()?;
    info!(count = reports.len(), "Listing reports");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No reports stored.");
        return Ok(());
    }
    for report in &reports {
        println!("{}", summary_line(report));
    }
    Ok(())
}

pub async fn handle_show(args: ShowArgs, config_path: Option<&str>) -> Result<(), LabsightError> {
    let config = super::load_with_db(config_path, args.db.as_deref()).await?;
    let db = Database::new(&config.database.path)?;
    let report = db
        .get_report(args.id)?
        .ok_or_else(|| LabsightError::NotFound(format!("Report {} not found", args.id)))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}

fn summary_line(report: &Report) -> String {
    format!(
        "#{:<5} {}  {}  ({} tests, {} abnormal)",
        report.id,
        report.created_at.format("%Y-%m-%d %H:%M"),
        report.title,
        report.metrics.total_tests,
        report.metrics.abnormal_tests,
    )
}

fn render(report: &Report) -> String {
    let m = &report.metrics;
    let mut out = format!(
        "{}\n{}\n\n{}\n\nTests: {} total, {} normal, {} abnormal\n",
        report.title,
        report.created_at.to_rfc3339(),
        report.summary,
        m.total_tests,
        m.normal_tests,
        m.abnormal_tests,
    );

    if !m.abnormal_alerts.is_empty() {
        out.push_str("\nNeeds attention:\n");
        for alert in &m.abnormal_alerts {
            out.push_str(&format!(
                "  ! {}: {} {} (expected {})\n",
                alert.name, alert.value, alert.unit, alert.expected
            ));
        }
    }
    if !m.normal_list.is_empty() {
        out.push_str("\nWithin range:\n");
        for result in &m.normal_list {
            out.push_str(&format!("  - {}: {} {}\n", result.name, result.value, result.unit));
        }
    }
    for (heading, items) in [
        ("Diet", &report.diet_recommendations),
        ("Exercise", &report.exercise_recommendations),
    ] {
        if !items.is_empty() {
            out.push_str(&format!("\n{}:\n", heading));
            for item in items {
                out.push_str(&format!("  * {}\n", item));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::sample_report;
    use chrono::{TimeZone, Utc};

    fn sample() -> Report {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        Report::from_draft(7, created_at, sample_report())
    }

    #[test]
    fn test_summary_line() {
        let line = summary_line(&sample());
        assert!(line.starts_with("#7"));
        assert!(line.contains("2025-03-01 09:30"));
        assert!(line.contains("Complete Blood Count & Lipids"));
        assert!(line.contains("(8 tests, 2 abnormal)"));
    }

    #[test]
    fn test_render_sections() {
        let text = render(&sample());
        assert!(text.contains("Needs attention:"));
        assert!(text.contains("Within range:"));
        assert!(text.contains("Diet:"));
        assert!(text.contains("Exercise:"));
    }

    #[test]
    fn test_render_skips_empty_sections() {
        let report = Report::from_draft(1, Utc::now(), Default::default());
        let text = render(&report);
        assert!(text.starts_with("Lab Report\n"));
        assert!(!text.contains("Needs attention:"));
        assert!(!text.contains("Diet:"));
    }
}
