use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Room, RoomVisibility};
use crate::store::{MembershipStore, RoomStore};

/// Holds a reference to the membership store so `list_top_public` can rank
/// by member count, mirroring the SQLite implementation's join.
pub struct InMemoryRoomStore<M: MembershipStore> {
    rooms: DashMap<Uuid, Room>,
    memberships: std::sync::Arc<M>,
}

impl<M: MembershipStore> InMemoryRoomStore<M> {
    pub fn new(memberships: std::sync::Arc<M>) -> Self {
        Self {
            rooms: DashMap::new(),
            memberships,
        }
    }
}

#[async_trait]
impl<M: MembershipStore + 'static> RoomStore for InMemoryRoomStore<M> {
    async fn insert(&self, room: Room) -> Result<()> {
        self.rooms.insert(room.id, room);
        Ok(())
    }

    async fn update(&self, room: Room) -> Result<()> {
        self.rooms.insert(room.id, room);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rooms.remove(&id);
        Ok(())
    }

    async fn exists_with_name(&self, name: &str) -> Result<bool> {
        Ok(self.rooms.iter().any(|r| r.name == name))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Room>> {
        let mut out = Vec::new();
        for room in self.rooms.iter() {
            if self.memberships.exists(room.id, user_id).await? {
                out.push(room.clone());
            }
        }
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_top_public(&self, limit: usize) -> Result<Vec<Room>> {
        let mut scored = Vec::new();
        for room in self.rooms.iter() {
            if room.is_public() {
                let count = self.memberships.count_for_room(room.id).await?;
                scored.push((count, room.clone()));
            }
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored.into_iter().take(limit).map(|(_, r)| r).collect())
    }

    async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<Room>> {
        let needle = query.to_lowercase();
        let mut out = Vec::new();
        for room in self.rooms.iter() {
            let haystack = format!(
                "{} {}",
                room.name,
                room.description.as_deref().unwrap_or("")
            )
            .to_lowercase();
            if !haystack.contains(&needle) {
                continue;
            }
            let visible = match room.visibility {
                RoomVisibility::Public => true,
                RoomVisibility::Private => self.memberships.exists(room.id, user_id).await?,
            };
            if visible {
                out.push(room.clone());
            }
        }
        Ok(out)
    }
}
