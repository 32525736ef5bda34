use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::User;
use crate::store::UserStore;

use super::Db;

pub struct SqliteUserStore {
    db: Arc<Db>,
}

impl SqliteUserStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let id: String = row.get(0)?;
        let created_at: String = row.get(3)?;
        let last_active: Option<String> = row.get(4)?;
        let last_login: Option<String> = row.get(5)?;
        Ok(User {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            username: row.get(1)?,
            password_hash: row.get(2)?,
            last_active: last_active.and_then(|s| s.parse::<DateTime<Utc>>().ok()),
            last_login: last_login.and_then(|s| s.parse::<DateTime<Utc>>().ok()),
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    const SELECT_COLUMNS: &'static str =
        "id, username, password_hash, created_at, last_active, last_login";
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, user: User) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.created_at.to_rfc3339()
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.db.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", Self::SELECT_COLUMNS),
            params![id.to_string()],
            Self::row_to_user,
        )
        .optional()
        .map_err(ChatError::store)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.db.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", Self::SELECT_COLUMNS),
            params![username],
            Self::row_to_user,
        )
        .optional()
        .map_err(ChatError::store)
    }

    async fn update(&self, user: User) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET password_hash = ?2, last_active = ?3, last_login = ?4 WHERE id = ?1",
            params![
                user.id.to_string(),
                user.password_hash,
                user.last_active.map(|t| t.to_rfc3339()),
                user.last_login.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
            .map_err(ChatError::store)?;
        Ok(())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.db.conn.lock().unwrap();
        let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT {} FROM users WHERE id IN ({})",
            Self::SELECT_COLUMNS,
            placeholders
        );
        let mut stmt = conn.prepare(&sql).map_err(ChatError::store)?;
        let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        let rows = stmt
            .query_map(rusqlite::params_from_iter(id_strings.iter()), Self::row_to_user)
            .map_err(ChatError::store)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(ChatError::store)?);
        }
        Ok(out)
    }
}
