//! Incident record store
//!
//! Save (insert or upsert), find by department sorted by time, delete by id.
//! No validation and no pagination.

use async_trait::async_trait;
use siren_common::{IncidentRecord, Result};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Document-collection interface for incident records
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Insert or replace a record, assigning an id when it has none
    async fn save(&self, record: IncidentRecord) -> Result<IncidentRecord>;

    /// Records whose department equals `department`, ordered by `time` ascending
    ///
    /// Ordering is plain string comparison of the stored time. Records without
    /// a time come first; ties keep insertion order.
    async fn find_by_department(&self, department: &str) -> Result<Vec<IncidentRecord>>;

    /// Remove a record; unknown ids are not an error
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// SQLite-backed [`CaseStore`]
#[derive(Clone)]
pub struct SqliteCaseStore {
    pool: SqlitePool,
}

impl SqliteCaseStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CaseStore for SqliteCaseStore {
    async fn save(&self, mut record: IncidentRecord) -> Result<IncidentRecord> {
        let id = match record.id.take() {
            Some(id) if !id.trim().is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };
        record.id = Some(id.clone());

        // created_at and rowid are kept on upsert
        sqlx::query(
            r#"
            INSERT INTO ecases (
                id, name, department, time, priority,
                location, summary, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                department = excluded.department,
                time = excluded.time,
                priority = excluded.priority,
                location = excluded.location,
                summary = excluded.summary,
                status = excluded.status
            "#,
        )
        .bind(&id)
        .bind(&record.name)
        .bind(&record.department)
        .bind(&record.time)
        .bind(&record.priority)
        .bind(&record.location)
        .bind(&record.summary)
        .bind(&record.status)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(case_id = %id, department = ?record.department, "Case saved");

        Ok(record)
    }

    async fn find_by_department(&self, department: &str) -> Result<Vec<IncidentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, department, time, priority, location, summary, status
            FROM ecases
            WHERE department = ?
            ORDER BY time ASC, rowid ASC
            "#,
        )
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM ecases WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(case_id = %id, removed = result.rows_affected(), "Case delete");

        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> IncidentRecord {
    IncidentRecord {
        id: row.get("id"),
        name: row.get("name"),
        department: row.get("department"),
        time: row.get("time"),
        priority: row.get("priority"),
        location: row.get("location"),
        summary: row.get("summary"),
        status: row.get("status"),
    }
}
