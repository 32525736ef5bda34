use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Analytics event types emitted onto the outbox by the services. Kept as
/// an open set of string-backed variants rather than a closed int enum, so
/// a sink can log an event type it doesn't yet special-case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventType {
    UserRegistered,
    UserLoggedIn,
    UserLoggedOut,
    UserDeleted,
    UserJoinedRoom,
    UserLeftRoom,
    UserConnected,
    UserDisconnected,
    UserForcedDisconnect,
    RoomCreated,
    RoomUpdated,
    RoomDeleted,
    JoinRequestCreated,
    /// Emitted for both the accept and the reject branch of
    /// `RoomService::handle_join_request` — preserved from the source this
    /// was distilled from rather than split into accept/reject variants.
    JoinRequestAccepted,
    NotificationRead,
    NotificationsAllRead,
    MessageSent,
    MessageEdited,
    MessageDeleted,
}

impl AnalyticsEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyticsEventType::UserRegistered => "user_registered",
            AnalyticsEventType::UserLoggedIn => "user_login",
            AnalyticsEventType::UserLoggedOut => "user_logout",
            AnalyticsEventType::UserDeleted => "user_deleted",
            AnalyticsEventType::UserJoinedRoom => "user_joined_room",
            AnalyticsEventType::UserLeftRoom => "user_left_room",
            AnalyticsEventType::UserConnected => "user_connected",
            AnalyticsEventType::UserDisconnected => "user_disconnected",
            AnalyticsEventType::UserForcedDisconnect => "user_forced_disconnect",
            AnalyticsEventType::RoomCreated => "room_created",
            AnalyticsEventType::RoomUpdated => "room_updated",
            AnalyticsEventType::RoomDeleted => "room_deleted",
            AnalyticsEventType::JoinRequestCreated => "join_request_created",
            AnalyticsEventType::JoinRequestAccepted => "join_request_accepted",
            AnalyticsEventType::NotificationRead => "notification_read",
            AnalyticsEventType::NotificationsAllRead => "notifications_all_read",
            AnalyticsEventType::MessageSent => "message_sent",
            AnalyticsEventType::MessageEdited => "message_edited",
            AnalyticsEventType::MessageDeleted => "message_deleted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: AnalyticsEventType,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(event_type: AnalyticsEventType, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            payload,
            occurred_at: Utc::now(),
        }
    }
}
