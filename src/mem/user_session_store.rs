use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::UserSession;
use crate::store::UserSessionStore;

pub struct InMemoryUserSessionStore {
    sessions: DashMap<Uuid, UserSession>,
    ttl: ChronoDuration,
    refresh_threshold: ChronoDuration,
}

impl InMemoryUserSessionStore {
    pub fn new(ttl: ChronoDuration, refresh_threshold: ChronoDuration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            refresh_threshold,
        }
    }
}

#[async_trait]
impl UserSessionStore for InMemoryUserSessionStore {
    async fn insert(&self, session: UserSession) -> Result<()> {
        self.sessions.insert(session.id, session);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserSession>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn touch(&self, id: Uuid) -> Result<Option<UserSession>> {
        let Some(mut session) = self.sessions.get_mut(&id) else {
            return Ok(None);
        };
        let remaining = session.expires_at - Utc::now();
        if remaining < self.refresh_threshold {
            session.expires_at = Utc::now() + self.ttl;
        }
        Ok(Some(session.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.sessions.remove(&id);
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<()> {
        self.sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }
}
