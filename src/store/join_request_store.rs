use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{JoinRequest, JoinRequestStatus};

#[async_trait]
pub trait JoinRequestStore: Send + Sync {
    async fn insert(&self, request: JoinRequest) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<JoinRequest>>;
    async fn set_status(&self, id: Uuid, status: JoinRequestStatus) -> Result<()>;
    async fn exists_pending(&self, room_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn list_pending_for_room(&self, room_id: Uuid) -> Result<Vec<JoinRequest>>;
}
