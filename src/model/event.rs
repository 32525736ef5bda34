use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// The wire-level events fanned out over a room's pub/sub channel and
/// pushed down open WebSocket connections. Generalizes the teacher's
/// single-variant `ChatEvent` to every broadcast the services emit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastEventType {
    MessageCreated,
    MessageEdited,
    MessageDeleted,
    UserJoinedRoom,
    UserLeftRoom,
    TypingIndicator,
    PresenceJoined,
    PresenceLeft,
    NotificationDelivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastEvent {
    pub event_type: BroadcastEventType,
    pub room_id: Uuid,
    pub data: serde_json::Value,
}

impl BroadcastEvent {
    pub fn new(event_type: BroadcastEventType, room_id: Uuid, data: serde_json::Value) -> Self {
        Self {
            event_type,
            room_id,
            data,
        }
    }

    /// Builds the wire-level `EventPayload` (user_id, username, timestamp,
    /// content) spec.md §3 describes, rather than serializing the `Message`
    /// row verbatim — the broadcast payload is keyed by `username`, not
    /// `sender_id`, so a client never needs a second lookup to render it.
    pub fn message_created(message: &Message, username: &str) -> Self {
        Self::new(
            BroadcastEventType::MessageCreated,
            message.room_id,
            serde_json::json!({
                "message_id": message.id,
                "user_id": message.sender_id,
                "username": username,
                "content": message.content,
                "timestamp": message.created_at.to_rfc3339(),
            }),
        )
    }

    pub fn message_edited(message: &Message, username: &str) -> Self {
        Self::new(
            BroadcastEventType::MessageEdited,
            message.room_id,
            serde_json::json!({
                "message_id": message.id,
                "user_id": message.sender_id,
                "username": username,
                "content": message.content,
                "timestamp": Utc::now().to_rfc3339(),
            }),
        )
    }

    pub fn message_deleted(room_id: Uuid, message_id: Uuid) -> Self {
        Self::new(
            BroadcastEventType::MessageDeleted,
            room_id,
            serde_json::json!({ "message_id": message_id }),
        )
    }

    pub fn typing(room_id: Uuid, user_id: Uuid, username: &str, is_typing: bool) -> Self {
        Self::new(
            BroadcastEventType::TypingIndicator,
            room_id,
            serde_json::json!({
                "user_id": user_id,
                "username": username,
                "is_typing": is_typing,
                "timestamp": Utc::now().to_rfc3339(),
            }),
        )
    }
}
