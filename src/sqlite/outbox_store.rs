use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::{Outbox, OutboxStatus};
use crate::store::OutboxStore;

use super::Db;

pub struct SqliteOutboxStore {
    db: Arc<Db>,
}

impl SqliteOutboxStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    fn status_str(status: OutboxStatus) -> &'static str {
        match status {
            OutboxStatus::Pending => "pending",
            OutboxStatus::InProgress => "in_progress",
            OutboxStatus::Sent => "sent",
            OutboxStatus::Failed => "failed",
        }
    }

    fn parse_status(s: &str) -> OutboxStatus {
        match s {
            "in_progress" => OutboxStatus::InProgress,
            "sent" => OutboxStatus::Sent,
            "failed" => OutboxStatus::Failed,
            _ => OutboxStatus::Pending,
        }
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<Outbox> {
        let id: String = row.get(0)?;
        let event_type: String = row.get(1)?;
        let dedup_key: String = row.get(2)?;
        let payload: String = row.get(3)?;
        let status: String = row.get(4)?;
        let retries: i64 = row.get(5)?;
        let max_retries: i64 = row.get(6)?;
        let last_error: Option<String> = row.get(7)?;
        let sent_at: Option<String> = row.get(8)?;
        let in_progress_until: Option<String> = row.get(9)?;
        let created_at: String = row.get(10)?;
        Ok(Outbox {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            event_type,
            dedup_key,
            payload: serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null),
            status: Self::parse_status(&status),
            retries: retries as u32,
            max_retries: max_retries as u32,
            last_error,
            sent_at: sent_at.and_then(|s| s.parse::<DateTime<Utc>>().ok()),
            in_progress_until: in_progress_until.and_then(|s| s.parse::<DateTime<Utc>>().ok()),
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl OutboxStore for SqliteOutboxStore {
    async fn insert_if_absent(&self, entry: Outbox) -> Result<bool> {
        let conn = self.db.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO outbox
                 (id, event_type, dedup_key, payload, status, retries, max_retries, last_error, sent_at, in_progress_until, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    entry.id.to_string(),
                    entry.event_type,
                    entry.dedup_key,
                    entry.payload.to_string(),
                    Self::status_str(entry.status),
                    entry.retries,
                    entry.max_retries,
                    entry.last_error,
                    entry.sent_at.map(|t| t.to_rfc3339()),
                    entry.in_progress_until.map(|t| t.to_rfc3339()),
                    entry.created_at.to_rfc3339(),
                ],
            )
            .map_err(ChatError::store)?;
        Ok(inserted > 0)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Outbox>> {
        let conn = self.db.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, event_type, dedup_key, payload, status, retries, max_retries, last_error, sent_at, in_progress_until, created_at
             FROM outbox WHERE id = ?1",
            params![id.to_string()],
            Self::row_to_entry,
        )
        .optional()
        .map_err(ChatError::store)
    }

    async fn exists_by_dedup_keys(&self, dedup_keys: &[String]) -> Result<Vec<String>> {
        if dedup_keys.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.db.conn.lock().unwrap();
        let placeholders = dedup_keys
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT dedup_key FROM outbox WHERE dedup_key IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql).map_err(ChatError::store)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            dedup_keys.iter().map(|k| k as &dyn rusqlite::ToSql).collect();
        let existing = stmt
            .query_map(params.as_slice(), |row| row.get::<_, String>(0))
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(existing)
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<Outbox>> {
        let conn = self.db.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, event_type, dedup_key, payload, status, retries, max_retries, last_error, sent_at, in_progress_until, created_at
                 FROM outbox WHERE status = 'pending' ORDER BY created_at ASC LIMIT ?1",
            )
            .map_err(ChatError::store)?;
        let entries = stmt
            .query_map(params![limit as i64], Self::row_to_entry)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    async fn try_claim(&self, id: Uuid, lease_until: DateTime<Utc>) -> Result<bool> {
        let conn = self.db.conn.lock().unwrap();
        let updated = conn
            .execute(
                "UPDATE outbox SET status = 'in_progress', in_progress_until = ?1
                 WHERE id = ?2 AND status = 'pending'",
                params![lease_until.to_rfc3339(), id.to_string()],
            )
            .map_err(ChatError::store)?;
        Ok(updated > 0)
    }

    async fn list_expired_leases(&self, now: DateTime<Utc>) -> Result<Vec<Outbox>> {
        let conn = self.db.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, event_type, dedup_key, payload, status, retries, max_retries, last_error, sent_at, in_progress_until, created_at
                 FROM outbox
                 WHERE status = 'in_progress' AND (in_progress_until IS NULL OR in_progress_until <= ?1)",
            )
            .map_err(ChatError::store)?;
        let entries = stmt
            .query_map(params![now.to_rfc3339()], Self::row_to_entry)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    async fn requeue(&self, id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE outbox SET status = 'pending', in_progress_until = NULL WHERE id = ?1",
            params![id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE outbox SET status = 'sent', sent_at = ?1, in_progress_until = NULL WHERE id = ?2",
            params![sent_at.to_rfc3339(), id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, status: OutboxStatus, error: String) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE outbox SET status = ?1, retries = retries + 1, last_error = ?2, in_progress_until = NULL WHERE id = ?3",
            params![Self::status_str(status), error, id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }
}
