use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use crate::error::Result;
use crate::store::PresenceStore;

/// Direct port of `wsprism-gateway`'s `Presence` struct to UUID keys: a
/// room -> users set and its inverse, kept in lockstep.
#[derive(Default)]
pub struct InMemoryPresenceStore {
    room_to_users: DashMap<Uuid, DashSet<Uuid>>,
    user_to_rooms: DashMap<Uuid, DashSet<Uuid>>,
}

impl InMemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceStore for InMemoryPresenceStore {
    async fn join(&self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        let first_in_room = self
            .room_to_users
            .entry(room_id)
            .or_default()
            .insert(user_id);
        self.user_to_rooms.entry(user_id).or_default().insert(room_id);
        Ok(first_in_room)
    }

    async fn leave(&self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut was_last = false;
        if let Some(set) = self.room_to_users.get(&room_id) {
            set.remove(&user_id);
            was_last = set.is_empty();
        }
        if let Some(set) = self.user_to_rooms.get(&user_id) {
            set.remove(&room_id);
        }
        Ok(was_last)
    }

    async fn users_in_room(&self, room_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .room_to_users
            .get(&room_id)
            .map(|set| set.iter().map(|u| *u).collect())
            .unwrap_or_default())
    }

    async fn rooms_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .user_to_rooms
            .get(&user_id)
            .map(|set| set.iter().map(|r| *r).collect())
            .unwrap_or_default())
    }

    async fn cleanup_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let Some((_, rooms)) = self.user_to_rooms.remove(&user_id) else {
            return Ok(Vec::new());
        };
        let mut cleared = Vec::new();
        for room_ref in rooms.iter() {
            let room_id = *room_ref.key();
            if let Some(set) = self.room_to_users.get(&room_id) {
                set.remove(&user_id);
                if set.is_empty() {
                    cleared.push(room_id);
                }
            }
        }
        Ok(cleared)
    }
}
