use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::User;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn update(&self, user: User) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Batch lookup keyed by unique user ids, used by
    /// `MessageService::get_recent_messages` to resolve usernames for a
    /// page of messages in a single call rather than one per message.
    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;
}
