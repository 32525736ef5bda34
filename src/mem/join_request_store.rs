use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{JoinRequest, JoinRequestStatus};
use crate::store::JoinRequestStore;

#[derive(Default)]
pub struct InMemoryJoinRequestStore {
    requests: DashMap<Uuid, JoinRequest>,
}

impl InMemoryJoinRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JoinRequestStore for InMemoryJoinRequestStore {
    async fn insert(&self, request: JoinRequest) -> Result<()> {
        self.requests.insert(request.id, request);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<JoinRequest>> {
        Ok(self.requests.get(&id).map(|r| r.clone()))
    }

    async fn set_status(&self, id: Uuid, status: JoinRequestStatus) -> Result<()> {
        if let Some(mut entry) = self.requests.get_mut(&id) {
            entry.status = status;
        }
        Ok(())
    }

    async fn exists_pending(&self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.requests.iter().any(|r| {
            r.room_id == room_id && r.user_id == user_id && r.status == JoinRequestStatus::Pending
        }))
    }

    async fn list_pending_for_room(&self, room_id: Uuid) -> Result<Vec<JoinRequest>> {
        Ok(self
            .requests
            .iter()
            .filter(|r| r.room_id == room_id && r.status == JoinRequestStatus::Pending)
            .map(|r| r.clone())
            .collect())
    }
}
