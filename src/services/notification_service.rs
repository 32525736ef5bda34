use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::Notification;
use crate::outbox::OutboxWriter;
use crate::store::{NotificationStore, OutboxStore};

/// Reading and acknowledging a user's notifications. Grounded on
/// `original_source/app/domain/services/notification.py`.
pub struct NotificationService<N, O> {
    notifications: Arc<N>,
    outbox: OutboxWriter<O>,
}

impl<N, O> NotificationService<N, O>
where
    N: NotificationStore,
    O: OutboxStore,
{
    pub fn new(notifications: Arc<N>, outbox: OutboxWriter<O>) -> Self {
        Self {
            notifications,
            outbox,
        }
    }

    pub async fn list_user_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        self.notifications.list_for_user(user_id, unread_only).await
    }

    pub async fn mark_as_read(&self, notification_id: Uuid, by: Uuid) -> Result<()> {
        let notification = self
            .notifications
            .get_by_id(notification_id)
            .await?
            .ok_or(ChatError::NotificationNotFound)?;
        if notification.user_id != by {
            return Err(ChatError::NotificationPermission);
        }
        if notification.read {
            return Ok(());
        }

        self.notifications.mark_read(notification_id).await?;

        self.outbox
            .write(
                "analytics:notification_read",
                format!("notif_read:{}", notification_id),
                serde_json::json!({ "notification_id": notification_id, "user_id": by }),
            )
            .await?;

        Ok(())
    }

    pub async fn mark_all_as_read(&self, user_id: Uuid) -> Result<usize> {
        let count = self.notifications.mark_all_read(user_id).await?;

        if count > 0 {
            self.outbox
                .write(
                    "analytics:notifications_all_read",
                    format!("notifications_all_read:{}:{}", user_id, Utc::now().timestamp_nanos_opt().unwrap_or_default()),
                    serde_json::json!({ "user_id": user_id, "count": count }),
                )
                .await?;
        }

        Ok(count)
    }

    pub async fn count_unread(&self, user_id: Uuid) -> Result<usize> {
        self.notifications.count_unread(user_id).await
    }
}
