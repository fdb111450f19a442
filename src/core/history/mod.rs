use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::core::report::Report;

/// Lightweight row for history listings: everything but the section bodies.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub section_count: usize,
}

/// Durable store of completed reports, newest-first by id. Sections are kept
/// as one JSON document per report; every mutation is a whole-row write, so
/// reads never observe a partially updated report.
#[derive(Clone)]
pub struct HistoryStore {
    db: Arc<Mutex<Connection>>,
}

impl HistoryStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    pub async fn initialize(&self) -> Result<()> {
        let db = self.db.lock().await;
        db.execute(
            "CREATE TABLE IF NOT EXISTS report_history (
                id INTEGER PRIMARY KEY,
                created_at TEXT NOT NULL,
                topic TEXT NOT NULL,
                sections_json TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Prepend a completed report. Never merges or dedupes by topic. Ids are
    /// creation-time millis; on the rare collision the id is bumped forward
    /// until free and the report is updated to match.
    pub async fn save(&self, report: &mut Report) -> Result<()> {
        let sections_json = serde_json::to_string(&report.sections)?;
        let db = self.db.lock().await;
        loop {
            let inserted = db.execute(
                "INSERT OR IGNORE INTO report_history (id, created_at, topic, sections_json)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    report.id,
                    report.created_at.to_rfc3339(),
                    report.topic,
                    sections_json
                ],
            )?;
            if inserted > 0 {
                return Ok(());
            }
            report.id += 1;
        }
    }

    /// All stored reports, newest-first. Rows that no longer deserialize are
    /// skipped with a warning instead of poisoning the whole list.
    pub async fn list(&self) -> Result<Vec<Report>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, created_at, topic, sections_json FROM report_history ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut reports = Vec::new();
        for row in rows {
            let (id, created_at, topic, sections_json) = row?;
            match decode_report(id, &created_at, &topic, &sections_json) {
                Some(report) => reports.push(report),
                None => warn!("Skipping malformed history row {}", id),
            }
        }
        Ok(reports)
    }

    /// Listing rows without deserializing section bodies.
    pub async fn summaries(&self) -> Result<Vec<HistorySummary>> {
        let reports = self.list().await?;
        Ok(reports
            .into_iter()
            .map(|r| HistorySummary {
                id: r.id,
                created_at: r.created_at,
                topic: r.topic,
                section_count: r.sections.len(),
            })
            .collect())
    }

    pub async fn load_by_id(&self, id: i64) -> Result<Option<Report>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT created_at, topic, sections_json FROM report_history WHERE id = ?1",
        )?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let created_at: String = row.get(0)?;
        let topic: String = row.get(1)?;
        let sections_json: String = row.get(2)?;
        match decode_report(id, &created_at, &topic, &sections_json) {
            Some(report) => Ok(Some(report)),
            None => {
                warn!("History row {} is malformed", id);
                Ok(None)
            }
        }
    }

    /// Returns true if a report was removed.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().await;
        let removed = db.execute("DELETE FROM report_history WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Returns the number of reports removed.
    pub async fn clear(&self) -> Result<usize> {
        let db = self.db.lock().await;
        let removed = db.execute("DELETE FROM report_history", [])?;
        Ok(removed)
    }

    /// Persist an edited section body for a stored report. Whole-row write,
    /// same as every other mutation.
    pub async fn update_section_content(
        &self,
        id: i64,
        section_index: usize,
        content: &str,
    ) -> Result<bool> {
        let Some(mut report) = self.load_by_id(id).await? else {
            return Ok(false);
        };
        if !report.replace_section_content(section_index, content) {
            return Ok(false);
        }
        let sections_json = serde_json::to_string(&report.sections)?;
        let db = self.db.lock().await;
        let updated = db.execute(
            "UPDATE report_history SET sections_json = ?1 WHERE id = ?2",
            params![sections_json, id],
        )?;
        Ok(updated > 0)
    }
}

fn decode_report(id: i64, created_at: &str, topic: &str, sections_json: &str) -> Option<Report> {
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .ok()?
        .with_timezone(&Utc);
    let sections = serde_json::from_str(sections_json).ok()?;
    Some(Report {
        id,
        created_at,
        topic: topic.to_string(),
        sections,
    })
}
