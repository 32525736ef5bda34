use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Room presence as a grow/shrink set per room, bidirectionally indexed so
/// a single user's disconnect can clear every room they were in without a
/// full scan. Modeled directly on `Presence` in `wsprism-gateway`.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Joins the room. Returns `true` if this was the user's first session
    /// in the room (caller should broadcast a join event), `false` if they
    /// were already present.
    async fn join(&self, room_id: Uuid, user_id: Uuid) -> Result<bool>;
    /// Leaves the room. Returns `true` if this was the user's last session
    /// in the room (caller should broadcast a leave event).
    async fn leave(&self, room_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn users_in_room(&self, room_id: Uuid) -> Result<Vec<Uuid>>;
    async fn rooms_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
    /// Removes a user from every room they're present in, returning the
    /// rooms they were removed from (each a "last leave" by construction).
    async fn cleanup_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
}
