use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::{JoinRequest, JoinRequestStatus};
use crate::store::JoinRequestStore;

use super::Db;

pub struct SqliteJoinRequestStore {
    db: Arc<Db>,
}

impl SqliteJoinRequestStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    fn status_str(status: JoinRequestStatus) -> &'static str {
        match status {
            JoinRequestStatus::Pending => "pending",
            JoinRequestStatus::Accepted => "accepted",
            JoinRequestStatus::Rejected => "rejected",
        }
    }

    fn parse_status(s: &str) -> JoinRequestStatus {
        match s {
            "accepted" => JoinRequestStatus::Accepted,
            "rejected" => JoinRequestStatus::Rejected,
            _ => JoinRequestStatus::Pending,
        }
    }

    fn row_to_request(row: &rusqlite::Row) -> rusqlite::Result<JoinRequest> {
        let id: String = row.get(0)?;
        let room_id: String = row.get(1)?;
        let user_id: String = row.get(2)?;
        let status: String = row.get(3)?;
        let created_at: String = row.get(4)?;
        Ok(JoinRequest {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            room_id: Uuid::parse_str(&room_id).unwrap_or_default(),
            user_id: Uuid::parse_str(&user_id).unwrap_or_default(),
            status: Self::parse_status(&status),
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl JoinRequestStore for SqliteJoinRequestStore {
    async fn insert(&self, request: JoinRequest) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO join_requests (id, room_id, user_id, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                request.id.to_string(),
                request.room_id.to_string(),
                request.user_id.to_string(),
                Self::status_str(request.status),
                request.created_at.to_rfc3339(),
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<JoinRequest>> {
        let conn = self.db.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, room_id, user_id, status, created_at FROM join_requests WHERE id = ?1",
            params![id.to_string()],
            Self::row_to_request,
        )
        .optional()
        .map_err(ChatError::store)
    }

    async fn set_status(&self, id: Uuid, status: JoinRequestStatus) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE join_requests SET status = ?1 WHERE id = ?2",
            params![Self::status_str(status), id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn exists_pending(&self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        let conn = self.db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM join_requests WHERE room_id = ?1 AND user_id = ?2 AND status = 'pending'",
                params![room_id.to_string(), user_id.to_string()],
                |r| r.get(0),
            )
            .map_err(ChatError::store)?;
        Ok(count > 0)
    }

    async fn list_pending_for_room(&self, room_id: Uuid) -> Result<Vec<JoinRequest>> {
        let conn = self.db.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, room_id, user_id, status, created_at FROM join_requests WHERE room_id = ?1 AND status = 'pending'",
            )
            .map_err(ChatError::store)?;
        let requests = stmt
            .query_map(params![room_id.to_string()], Self::row_to_request)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(requests)
    }
}
