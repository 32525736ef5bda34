use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::{BroadcastEvent, Message};
use crate::outbox::OutboxWriter;
use crate::store::{MembershipStore, MessageStore, OutboxStore, PubSubBus, UserStore};

/// `get_recent`'s limit is clamped into this range regardless of what the
/// caller asks for.
const MIN_RECENT_LIMIT: usize = 1;
const MAX_RECENT_LIMIT: usize = 200;

/// Sending, editing, deleting, and reading room messages. Grounded on
/// `original_source/app/domain/services/message.py`, with the membership
/// check on `send_message` kept as the distilled spec already specifies
/// it (the original has no such check).
pub struct MessageService<Ms, Me, B, O, Us> {
    messages: Arc<Ms>,
    memberships: Arc<Me>,
    bus: Arc<B>,
    outbox: OutboxWriter<O>,
    users: Arc<Us>,
}

impl<Ms, Me, B, O, Us> MessageService<Ms, Me, B, O, Us>
where
    Ms: MessageStore,
    Me: MembershipStore,
    B: PubSubBus,
    O: OutboxStore,
    Us: UserStore,
{
    pub fn new(
        messages: Arc<Ms>,
        memberships: Arc<Me>,
        bus: Arc<B>,
        outbox: OutboxWriter<O>,
        users: Arc<Us>,
    ) -> Self {
        Self {
            messages,
            memberships,
            bus,
            outbox,
            users,
        }
    }

    pub async fn send_message(&self, room_id: Uuid, sender_id: Uuid, content: &str) -> Result<Message> {
        if !self.memberships.exists(room_id, sender_id).await? {
            return Err(ChatError::RoomPermission);
        }

        let message = Message::new(room_id, sender_id, content);
        self.messages.insert(message.clone()).await?;

        let sender = self.users.get_by_id(sender_id).await?.ok_or(ChatError::UserNotFound)?;
        self.bus
            .publish(room_id, BroadcastEvent::message_created(&message, &sender.username))
            .await?;

        self.outbox
            .write(
                "analytics:message_sent",
                format!("message_sent:{}", message.id),
                serde_json::json!({ "message_id": message.id, "room_id": room_id, "sender_id": sender_id }),
            )
            .await?;

        Ok(message)
    }

    pub async fn edit_message(&self, message_id: Uuid, by: Uuid, content: &str) -> Result<Message> {
        let mut message = self
            .messages
            .get_by_id(message_id)
            .await?
            .ok_or(ChatError::MessageNotFound)?;
        if message.sender_id != by {
            return Err(ChatError::MessagePermission);
        }
        if message.is_deleted() {
            return Err(ChatError::MessageNotFound);
        }

        message.content = content.to_string();
        message.edited_at = Some(Utc::now());
        self.messages.update(message.clone()).await?;

        let sender = self.users.get_by_id(message.sender_id).await?.ok_or(ChatError::UserNotFound)?;
        self.bus
            .publish(message.room_id, BroadcastEvent::message_edited(&message, &sender.username))
            .await?;

        self.outbox
            .write(
                "analytics:message_edited",
                format!("message_edited:{}", message_id),
                serde_json::json!({ "message_id": message_id, "room_id": message.room_id }),
            )
            .await?;

        Ok(message)
    }

    pub async fn delete_message(&self, message_id: Uuid, by: Uuid) -> Result<()> {
        let mut message = self
            .messages
            .get_by_id(message_id)
            .await?
            .ok_or(ChatError::MessageNotFound)?;
        if message.sender_id != by {
            return Err(ChatError::MessagePermission);
        }
        if message.is_deleted() {
            return Ok(());
        }

        message.deleted_at = Some(Utc::now());
        self.messages.update(message.clone()).await?;

        self.bus
            .publish(
                message.room_id,
                BroadcastEvent::message_deleted(message.room_id, message_id),
            )
            .await?;

        self.outbox
            .write(
                "analytics:message_deleted",
                format!("message_deleted:{}", message_id),
                serde_json::json!({ "message_id": message_id, "room_id": message.room_id }),
            )
            .await?;

        Ok(())
    }

    /// Most-recent-first page for a room, optionally older than `before`.
    /// Requires the caller to be a member; `limit` is clamped to
    /// `[1, 200]` regardless of what's asked for.
    pub async fn get_recent_messages(
        &self,
        room_id: Uuid,
        user_id: Uuid,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>> {
        if !self.memberships.exists(room_id, user_id).await? {
            return Err(ChatError::RoomPermission);
        }
        let clamped = limit.clamp(MIN_RECENT_LIMIT, MAX_RECENT_LIMIT);
        self.messages.get_page(room_id, clamped, before).await
    }

    /// Batch-resolves `user_id -> username` for a page of messages in a
    /// single store call, per the spec's "single batch lookup" requirement
    /// rather than one `UserStore::get_by_id` per message.
    pub async fn resolve_senders(
        &self,
        messages: &[Message],
    ) -> Result<std::collections::HashMap<Uuid, String>> {
        let mut ids: Vec<Uuid> = messages.iter().map(|m| m.sender_id).collect();
        ids.sort();
        ids.dedup();
        let users = self.users.get_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }

    pub async fn get_messages_since(&self, room_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Message>> {
        self.messages.get_since(room_id, since).await
    }

    pub async fn get_user_messages(&self, user_id: Uuid, limit: usize) -> Result<Vec<Message>> {
        self.messages.get_for_user(user_id, limit).await
    }
}
