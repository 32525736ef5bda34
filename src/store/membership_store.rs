use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Membership;

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Idempotent: inserting an existing `(room_id, user_id)` pair is a
    /// no-op, not a conflict.
    async fn add(&self, membership: Membership) -> Result<()>;
    async fn remove(&self, room_id: Uuid, user_id: Uuid) -> Result<()>;
    async fn exists(&self, room_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn count_for_room(&self, room_id: Uuid) -> Result<usize>;
    async fn remove_all_for_room(&self, room_id: Uuid) -> Result<()>;
}
