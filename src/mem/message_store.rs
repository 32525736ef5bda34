use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Message;
use crate::store::MessageStore;

#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: DashMap<Uuid, Message>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self) -> Vec<Message> {
        let mut all: Vec<Message> = self.messages.iter().map(|m| m.clone()).collect();
        all.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        all
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: Message) -> Result<()> {
        self.messages.insert(message.id, message);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(self.messages.get(&id).map(|m| m.clone()))
    }

    async fn update(&self, message: Message) -> Result<()> {
        self.messages.insert(message.id, message);
        Ok(())
    }

    async fn get_recent(&self, room_id: Uuid, limit: usize) -> Result<Vec<Message>> {
        let mut in_room: Vec<Message> = self
            .sorted()
            .into_iter()
            .filter(|m| m.room_id == room_id && !m.is_deleted())
            .collect();
        if in_room.len() > limit {
            in_room = in_room.split_off(in_room.len() - limit);
        }
        Ok(in_room)
    }

    async fn get_page(
        &self,
        room_id: Uuid,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>> {
        let mut newest_first: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| {
                m.room_id == room_id
                    && !m.is_deleted()
                    && before.map(|b| m.created_at < b).unwrap_or(true)
            })
            .map(|m| m.clone())
            .collect();
        newest_first.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        newest_first.truncate(limit);
        Ok(newest_first)
    }

    async fn get_since(&self, room_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Message>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|m| m.room_id == room_id && m.created_at > since && !m.is_deleted())
            .collect())
    }

    async fn get_for_user(&self, user_id: Uuid, limit: usize) -> Result<Vec<Message>> {
        let mut mine: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id && !m.is_deleted())
            .map(|m| m.clone())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine.truncate(limit);
        Ok(mine)
    }

    async fn get_since_all_rooms(
        &self,
        since: DateTime<Utc>,
        limit: usize,
        start_after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<Message>> {
        let page: Vec<Message> = self
            .sorted()
            .into_iter()
            .filter(|m| {
                m.created_at >= since
                    && start_after
                        .map(|cursor| (m.created_at, m.id) > cursor)
                        .unwrap_or(true)
            })
            .take(limit)
            .collect();
        Ok(page)
    }
}
