use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::WsSession;
use crate::store::WsSessionStore;

#[derive(Default)]
pub struct InMemoryWsSessionStore {
    sessions: DashMap<Uuid, WsSession>,
}

impl InMemoryWsSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WsSessionStore for InMemoryWsSessionStore {
    async fn insert(&self, session: WsSession) -> Result<()> {
        self.sessions.insert(session.id, session);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<WsSession>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn touch_ping(&self, id: Uuid) -> Result<()> {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_ping_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.sessions.remove(&id);
        Ok(())
    }

    async fn list_for_room(&self, room_id: Uuid) -> Result<Vec<WsSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.room_id == room_id)
            .map(|s| s.clone())
            .collect())
    }

    async fn list_for_user_in_room(&self, user_id: Uuid, room_id: Uuid) -> Result<Vec<WsSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.room_id == room_id)
            .map(|s| s.clone())
            .collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WsSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.clone())
            .collect())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()> {
        self.sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn is_user_online(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.sessions.iter().any(|s| s.user_id == user_id))
    }
}
