use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Notification;

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: Notification) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>>;
    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>>;
    async fn mark_read(&self, id: Uuid) -> Result<()>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<usize>;
    async fn count_unread(&self, user_id: Uuid) -> Result<usize>;
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()>;
}
