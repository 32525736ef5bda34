use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::User;
use crate::store::UserStore;

#[derive(Default)]
pub struct InMemoryUserStore {
    by_id: DashMap<Uuid, User>,
    ids_by_username: DashMap<String, Uuid>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<()> {
        self.ids_by_username.insert(user.username.clone(), user.id);
        self.by_id.insert(user.id, user);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.by_id.get(&id).map(|r| r.clone()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let Some(id) = self.ids_by_username.get(username).map(|r| *r) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|r| r.clone()))
    }

    async fn update(&self, user: User) -> Result<()> {
        self.by_id.insert(user.id, user);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        if let Some((_, user)) = self.by_id.remove(&id) {
            self.ids_by_username.remove(&user.username);
        }
        Ok(())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(ids.iter().filter_map(|id| self.by_id.get(id).map(|r| r.clone())).collect())
    }
}
