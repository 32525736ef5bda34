use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Notification;
use crate::store::NotificationStore;

#[derive(Default)]
pub struct InMemoryNotificationStore {
    notifications: DashMap<Uuid, Notification>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, notification: Notification) -> Result<()> {
        self.notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        Ok(self.notifications.get(&id).map(|n| n.clone()))
    }

    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>> {
        let mut out: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.read))
            .map(|n| n.clone())
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        if let Some(mut n) = self.notifications.get_mut(&id) {
            n.read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<usize> {
        let mut count = 0;
        for mut n in self.notifications.iter_mut() {
            if n.user_id == user_id && !n.read {
                n.read = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()> {
        self.notifications.retain(|_, n| n.user_id != user_id);
        Ok(())
    }
}
