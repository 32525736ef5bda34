use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::{Notification, NotificationType};
use crate::store::NotificationStore;

use super::Db;

pub struct SqliteNotificationStore {
    db: Arc<Db>,
}

impl SqliteNotificationStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    fn type_str(t: NotificationType) -> &'static str {
        match t {
            NotificationType::JoinRequestCreated => "join_request_created",
            NotificationType::JoinRequestAccepted => "join_request_accepted",
            NotificationType::JoinRequestRejected => "join_request_rejected",
        }
    }

    fn parse_type(s: &str) -> NotificationType {
        match s {
            "join_request_accepted" => NotificationType::JoinRequestAccepted,
            "join_request_rejected" => NotificationType::JoinRequestRejected,
            _ => NotificationType::JoinRequestCreated,
        }
    }

    fn row_to_notification(row: &rusqlite::Row) -> rusqlite::Result<Notification> {
        let id: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let notification_type: String = row.get(2)?;
        let payload: String = row.get(3)?;
        let read: i64 = row.get(4)?;
        let created_at: String = row.get(5)?;
        Ok(Notification {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            user_id: Uuid::parse_str(&user_id).unwrap_or_default(),
            notification_type: Self::parse_type(&notification_type),
            payload: serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null),
            read: read != 0,
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl NotificationStore for SqliteNotificationStore {
    async fn insert(&self, notification: Notification) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO notifications (id, user_id, notification_type, payload, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                notification.id.to_string(),
                notification.user_id.to_string(),
                Self::type_str(notification.notification_type),
                notification.payload.to_string(),
                notification.read as i64,
                notification.created_at.to_rfc3339(),
            ],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let conn = self.db.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, user_id, notification_type, payload, read, created_at FROM notifications WHERE id = ?1",
            params![id.to_string()],
            Self::row_to_notification,
        )
        .optional()
        .map_err(ChatError::store)
    }

    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>> {
        let conn = self.db.conn.lock().unwrap();
        let sql = if unread_only {
            "SELECT id, user_id, notification_type, payload, read, created_at FROM notifications
             WHERE user_id = ?1 AND read = 0 ORDER BY created_at DESC"
        } else {
            "SELECT id, user_id, notification_type, payload, read, created_at FROM notifications
             WHERE user_id = ?1 ORDER BY created_at DESC"
        };
        let mut stmt = conn.prepare(sql).map_err(ChatError::store)?;
        let notifications = stmt
            .query_map(params![user_id.to_string()], Self::row_to_notification)
            .map_err(ChatError::store)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "UPDATE notifications SET read = 1 WHERE id = ?1",
            params![id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<usize> {
        let conn = self.db.conn.lock().unwrap();
        let updated = conn
            .execute(
                "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
                params![user_id.to_string()],
            )
            .map_err(ChatError::store)?;
        Ok(updated)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<usize> {
        let conn = self.db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND read = 0",
                params![user_id.to_string()],
                |r| r.get(0),
            )
            .map_err(ChatError::store)?;
        Ok(count as usize)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()> {
        let conn = self.db.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM notifications WHERE user_id = ?1",
            params![user_id.to_string()],
        )
        .map_err(ChatError::store)?;
        Ok(())
    }
}
