use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Room;

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn insert(&self, room: Room) -> Result<()>;
    async fn update(&self, room: Room) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Room>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn exists_with_name(&self, name: &str) -> Result<bool>;

    /// Rooms a user is a member of, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Room>>;
    /// Public rooms ordered by some popularity proxy (member count), for
    /// the discovery listing.
    async fn list_top_public(&self, limit: usize) -> Result<Vec<Room>>;
    /// Case-insensitive substring search across name and description,
    /// scoped to the rooms a user may see (public, or private + member).
    async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<Room>>;
}
