use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::model::Message;

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, message: Message) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Message>>;
    async fn update(&self, message: Message) -> Result<()>;

    /// Most recent `limit` non-deleted messages in a room, oldest first.
    async fn get_recent(&self, room_id: Uuid, limit: usize) -> Result<Vec<Message>>;
    /// A page of non-deleted messages, most-recent-first, capped at
    /// `limit` and optionally older than `before` (exclusive) for
    /// backward pagination.
    async fn get_page(
        &self,
        room_id: Uuid,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>>;
    /// Messages in a room created strictly after `since`, oldest first.
    async fn get_since(&self, room_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Message>>;
    /// A single user's messages across all rooms, newest first.
    async fn get_for_user(&self, user_id: Uuid, limit: usize) -> Result<Vec<Message>>;

    /// Keyset page across every room's messages ordered by
    /// `(created_at, id)`, used by the outbox repair job's reconciliation
    /// sweep. `start_after`, when given, excludes rows at or before that
    /// cursor position.
    async fn get_since_all_rooms(
        &self,
        since: DateTime<Utc>,
        limit: usize,
        start_after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<Message>>;
}
