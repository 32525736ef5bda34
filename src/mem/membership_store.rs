use async_trait::async_trait;
use dashmap::DashSet;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Membership;
use crate::store::MembershipStore;

#[derive(Default)]
pub struct InMemoryMembershipStore {
    pairs: DashSet<(Uuid, Uuid)>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn add(&self, membership: Membership) -> Result<()> {
        self.pairs.insert((membership.room_id, membership.user_id));
        Ok(())
    }

    async fn remove(&self, room_id: Uuid, user_id: Uuid) -> Result<()> {
        self.pairs.remove(&(room_id, user_id));
        Ok(())
    }

    async fn exists(&self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.pairs.contains(&(room_id, user_id)))
    }

    async fn count_for_room(&self, room_id: Uuid) -> Result<usize> {
        Ok(self.pairs.iter().filter(|p| p.0 == room_id).count())
    }

    async fn remove_all_for_room(&self, room_id: Uuid) -> Result<()> {
        self.pairs.retain(|p| p.0 != room_id);
        Ok(())
    }
}
