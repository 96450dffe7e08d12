use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use crate::errors::LabsightError;
use crate::models::{Report, ReportDraft};
use super::Database;

const REPORT_COLUMNS: &str =
    "id, title, summary, metrics, diet_recommendations, exercise_recommendations, created_at";

/// Columns as stored; JSON columns are decoded after the statement finishes.
struct ReportRow {
    id: i64,
    title: String,
    summary: String,
    metrics: String,
    diet_recommendations: String,
    exercise_recommendations: String,
    created_at: String,
}

impl ReportRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            summary: row.get(2)?,
            metrics: row.get(3)?,
            diet_recommendations: row.get(4)?,
            exercise_recommendations: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_report(self) -> Result<Report, LabsightError> {
        let id = self.id;
        let decode_err = |column: &str, e: serde_json::Error| {
            LabsightError::Database(format!("Corrupt {} for report {}: {}", column, id, e))
        };
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| LabsightError::Database(format!("Corrupt created_at for report {}: {}", id, e)))?
            .with_timezone(&Utc);

        Ok(Report {
            id,
            metrics: serde_json::from_str(&self.metrics).map_err(|e| decode_err("metrics", e))?,
            diet_recommendations: serde_json::from_str(&self.diet_recommendations)
                .map_err(|e| decode_err("diet_recommendations", e))?,
            exercise_recommendations: serde_json::from_str(&self.exercise_recommendations)
                .map_err(|e| decode_err("exercise_recommendations", e))?,
            title: self.title,
            summary: self.summary,
            created_at,
        })
    }
}

/// Fixed-width so lexical order in SQLite matches chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    pub fn create_report(&self, draft: &ReportDraft) -> Result<Report, LabsightError> {
        let created_at = Utc::now().trunc_subsecs(6);
        let metrics = serde_json::to_string(&draft.metrics)?;
        let diet = serde_json::to_string(&draft.diet_recommendations)?;
        let exercise = serde_json::to_string(&draft.exercise_recommendations)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO reports (title, summary, metrics, diet_recommendations, exercise_recommendations, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![draft.title, draft.summary, metrics, diet, exercise, format_timestamp(&created_at)],
        ).map_err(|e| LabsightError::Database(format!("Failed to create report: {}", e)))?;
        let id = conn.last_insert_rowid();

        Ok(Report::from_draft(id, created_at, draft.clone()))
    }

    pub fn get_report(&self, id: i64) -> Result<Option<Report>, LabsightError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM reports WHERE id = ?1", REPORT_COLUMNS))
            .map_err(|e| LabsightError::Database(format!("Query failed: {}", e)))?;

        let row = match stmt.query_row(rusqlite::params![id], ReportRow::from_row) {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(LabsightError::Database(format!("Query error: {}", e))),
        };
        row.into_report().map(Some)
    }

    /// All reports, newest first.
    pub fn list_reports(&self) -> Result<Vec<Report>, LabsightError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reports ORDER BY created_at DESC, id DESC",
            REPORT_COLUMNS
        )).map_err(|e| LabsightError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], ReportRow::from_row)
            .map_err(|e| LabsightError::Database(format!("Query error: {}", e)))?;

        let mut reports = Vec::new();
        for row in rows {
            let row = row.map_err(|e| LabsightError::Database(format!("Row error: {}", e)))?;
            reports.push(row.into_report()?);
        }
        Ok(reports)
    }

    pub fn count_reports(&self) -> Result<usize, LabsightError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))
            .map_err(|e| LabsightError::Database(format!("Count failed: {}", e)))?;
        Ok(count as usize)
    }
}
