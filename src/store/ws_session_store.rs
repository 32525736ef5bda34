use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::WsSession;

#[async_trait]
pub trait WsSessionStore: Send + Sync {
    async fn insert(&self, session: WsSession) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<WsSession>>;
    async fn touch_ping(&self, id: Uuid) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list_for_room(&self, room_id: Uuid) -> Result<Vec<WsSession>>;
    /// All of a user's sessions in a specific room, so a moderation action
    /// can force-disconnect every tab/device at once.
    async fn list_for_user_in_room(&self, user_id: Uuid, room_id: Uuid) -> Result<Vec<WsSession>>;
    /// Every session a user holds, across all rooms — used by
    /// `UserService::logout_user`/`delete_user` to tear down every
    /// connection when a cookie session ends.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WsSession>>;
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()>;
    async fn is_user_online(&self, user_id: Uuid) -> Result<bool>;
}
