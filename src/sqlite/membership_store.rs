use async_trait::async_trait;
use rusqlite::params;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::Membership;
use crate::store::MembershipStore;

use super::Db;

pub struct SqliteMembershipStore {
    db: Arc<Db>,
}

impl SqliteMembershipStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipStore for SqliteMembershipStore {
    async fn add(&self, membership: Membership) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO memberships (room_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
            params![
                membership.room_id.to_string(),
                membership.user_id.to_string(),
                membership.joined_at.to_rfc3339(),
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn remove(&self, room_id: Uuid, user_id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM memberships WHERE room_id = ?1 AND user_id = ?2",
            params![room_id.to_string(), user_id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn exists(&self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        let conn = self.db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM memberships WHERE room_id = ?1 AND user_id = ?2",
                params![room_id.to_string(), user_id.to_string()],
                |r| r.get(0),
            )
            .map_err(ChatError::store)?;
        Ok(count > 0)
    }

    async fn count_for_room(&self, room_id: Uuid) -> Result<usize> {
        let conn = self.db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM memberships WHERE room_id = ?1",
                params![room_id.to_string()],
                |r| r.get(0),
            )
            .map_err(ChatError::store)?;
        Ok(count as usize)
    }

    async fn remove_all_for_room(&self, room_id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM memberships WHERE room_id = ?1",
            params![room_id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }
}
