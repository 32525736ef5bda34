use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::UserSession;

#[async_trait]
pub trait UserSessionStore: Send + Sync {
    async fn insert(&self, session: UserSession) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<UserSession>>;
    /// Sliding-TTL extension: if the session is within the configured
    /// refresh threshold of expiry, push `expires_at` back out to the full
    /// TTL and persist it. A no-op otherwise.
    async fn touch(&self, id: Uuid) -> Result<Option<UserSession>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()>;
}
