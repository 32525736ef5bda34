use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::{Room, RoomVisibility};
use crate::store::RoomStore;

use super::Db;

pub struct SqliteRoomStore {
    db: Arc<Db>,
}

impl SqliteRoomStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    fn row_to_room(row: &rusqlite::Row) -> rusqlite::Result<Room> {
        let id: String = row.get(0)?;
        let visibility: String = row.get(3)?;
        let creator_id: String = row.get(4)?;
        let created_at: String = row.get(5)?;
        let updated_at: String = row.get(6)?;
        Ok(Room {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            name: row.get(1)?,
            description: row.get(2)?,
            visibility: if visibility == "public" {
                RoomVisibility::Public
            } else {
                RoomVisibility::Private
            },
            creator_id: Uuid::parse_str(&creator_id).unwrap_or_default(),
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: updated_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn visibility_str(visibility: RoomVisibility) -> &'static str {
        match visibility {
            RoomVisibility::Public => "public",
            RoomVisibility::Private => "private",
        }
    }
}

#[async_trait]
impl RoomStore for SqliteRoomStore {
    async fn insert(&self, room: Room) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rooms (id, name, description, visibility, creator_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                room.id.to_string(),
                room.name,
                room.description,
                Self::visibility_str(room.visibility),
                room.creator_id.to_string(),
                room.created_at.to_rfc3339(),
                room.updated_at.to_rfc3339(),
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn update(&self, room: Room) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE rooms SET name = ?1, description = ?2, visibility = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                room.name,
                room.description,
                Self::visibility_str(room.visibility),
                room.updated_at.to_rfc3339(),
                room.id.to_string(),
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        let conn = self.db.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, description, visibility, creator_id, created_at, updated_at FROM rooms WHERE id = ?1",
            params![id.to_string()],
            Self::row_to_room,
        )
        .optional()
        .map_err(ChatError::store)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute("DELETE FROM rooms WHERE id = ?1", params![id.to_string()])
            .map_err(ChatError::store)?;
        Ok(())
    }

    async fn exists_with_name(&self, name: &str) -> Result<bool> {
        let conn = self.db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM rooms WHERE name = ?1",
                params![name],
                |r| r.get(0),
            )
            .map_err(ChatError::store)?;
        Ok(count > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Room>> {
        let conn = self.db.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT r.id, r.name, r.description, r.visibility, r.creator_id, r.created_at, r.updated_at
                 FROM rooms r JOIN memberships m ON m.room_id = r.id
                 WHERE m.user_id = ?1 ORDER BY r.created_at DESC",
            )
            .map_err(ChatError::store)?;
        let rooms = stmt
            .query_map(params![user_id.to_string()], Self::row_to_room)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rooms)
    }

    async fn list_top_public(&self, limit: usize) -> Result<Vec<Room>> {
        let conn = self.db.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT r.id, r.name, r.description, r.visibility, r.creator_id, r.created_at, r.updated_at
                 FROM rooms r LEFT JOIN memberships m ON m.room_id = r.id
                 WHERE r.visibility = 'public'
                 GROUP BY r.id
                 ORDER BY COUNT(m.user_id) DESC
                 LIMIT ?1",
            )
            .map_err(ChatError::store)?;
        let rooms = stmt
            .query_map(params![limit as i64], Self::row_to_room)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rooms)
    }

    async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<Room>> {
        let conn = self.db.conn.lock().unwrap();
        let needle = format!("%{}%", query.to_lowercase());
        let mut stmt = conn
            .prepare(
                "SELECT r.id, r.name, r.description, r.visibility, r.creator_id, r.created_at, r.updated_at
                 FROM rooms r
                 WHERE (LOWER(r.name) LIKE ?1 OR LOWER(COALESCE(r.description, '')) LIKE ?1)
                   AND (r.visibility = 'public' OR EXISTS (
                        SELECT 1 FROM memberships m WHERE m.room_id = r.id AND m.user_id = ?2
                   ))
                 ORDER BY r.created_at DESC",
            )
            .map_err(ChatError::store)?;
        let rooms = stmt
            .query_map(params![needle, user_id.to_string()], Self::row_to_room)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rooms)
    }
}
