use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{ChatError, Result};
use crate::model::{AnalyticsEventType, BroadcastEvent, WsSession};
use crate::outbox::OutboxWriter;
use crate::store::{OutboxStore, PresenceStore, PubSubBus, UserStore, WsSessionStore};

/// Connection lifecycle for an open WebSocket: presence, typing, ping
/// keepalive, and moderation-driven forced disconnects. Grounded on
/// `original_source/app/domain/services/websocket.py` and
/// `original_source/app/domain/services/presence.py`; the room-join/leave
/// broadcast pairing follows `wsprism-gateway`'s presence-join/presence-leave
/// events.
pub struct WebSocketService<P, W, B, O, U> {
    presence: Arc<P>,
    ws_sessions: Arc<W>,
    bus: Arc<B>,
    outbox: OutboxWriter<O>,
    users: Arc<U>,
    config: EngineConfig,
}

impl<P, W, B, O, U> WebSocketService<P, W, B, O, U>
where
    P: PresenceStore,
    W: WsSessionStore,
    B: PubSubBus,
    O: OutboxStore,
    U: UserStore,
{
    pub fn new(
        presence: Arc<P>,
        ws_sessions: Arc<W>,
        bus: Arc<B>,
        outbox: OutboxWriter<O>,
        users: Arc<U>,
        config: EngineConfig,
    ) -> Self {
        Self {
            presence,
            ws_sessions,
            bus,
            outbox,
            users,
            config,
        }
    }

    /// Registers a new connection and, if it's the user's first session in
    /// the room, broadcasts `PresenceJoined`.
    pub async fn connect(&self, user_id: Uuid, room_id: Uuid) -> Result<WsSession> {
        self.users.get_by_id(user_id).await?.ok_or(ChatError::UserNotFound)?;

        let session = WsSession::new(
            user_id,
            room_id,
            ChronoDuration::seconds(self.config.web_socket_session_ttl_secs as i64),
        );
        self.ws_sessions.insert(session.clone()).await?;

        self.outbox
            .write(
                format!("analytics:{}", AnalyticsEventType::UserConnected.as_str()),
                format!("user_connected:{}", session.id),
                serde_json::json!({ "user_id": user_id, "room_id": room_id, "session_id": session.id }),
            )
            .await?;

        let first_session = self.presence.join(room_id, user_id).await?;
        if first_session {
            self.bus
                .publish(
                    room_id,
                    BroadcastEvent::new(
                        crate::model::BroadcastEventType::PresenceJoined,
                        room_id,
                        serde_json::json!({ "user_id": user_id }),
                    ),
                )
                .await?;
        }

        Ok(session)
    }

    /// Tears down a connection and, if that was the user's last session in
    /// the room, broadcasts `PresenceLeft`.
    pub async fn disconnect(&self, session_id: Uuid) -> Result<()> {
        let Some(session) = self.ws_sessions.get(session_id).await? else {
            return Ok(());
        };
        self.ws_sessions.delete(session_id).await?;

        self.outbox
            .write(
                format!("analytics:{}", AnalyticsEventType::UserDisconnected.as_str()),
                format!("user_disconnected:{}", session_id),
                serde_json::json!({ "user_id": session.user_id, "room_id": session.room_id, "session_id": session_id }),
            )
            .await?;

        let remaining = self
            .ws_sessions
            .list_for_user_in_room(session.user_id, session.room_id)
            .await?;
        if remaining.is_empty() {
            let last_session = self.presence.leave(session.room_id, session.user_id).await?;
            if last_session {
                self.bus
                    .publish(
                        session.room_id,
                        BroadcastEvent::new(
                            crate::model::BroadcastEventType::PresenceLeft,
                            session.room_id,
                            serde_json::json!({ "user_id": session.user_id }),
                        ),
                    )
                    .await?;
            }
        }

        Ok(())
    }

    pub async fn update_ping(&self, session_id: Uuid) -> Result<()> {
        let session = self
            .ws_sessions
            .get(session_id)
            .await?
            .ok_or(ChatError::WsSessionNotFound)?;
        self.ws_sessions.touch_ping(session_id).await?;
        if let Some(mut user) = self.users.get_by_id(session.user_id).await? {
            user.last_active = Some(Utc::now());
            self.users.update(user).await?;
        }
        Ok(())
    }

    /// `username` must match the caller's own record — callers pass
    /// whatever the client claimed, and this rejects an impersonation
    /// attempt rather than broadcasting it.
    pub async fn typing_indicator(
        &self,
        room_id: Uuid,
        user_id: Uuid,
        username: &str,
        is_typing: bool,
    ) -> Result<()> {
        let user = self.users.get_by_id(user_id).await?.ok_or(ChatError::UserNotFound)?;
        if user.username != username {
            return Err(ChatError::WsSessionPermission);
        }
        self.bus
            .publish(room_id, BroadcastEvent::typing(room_id, user_id, username, is_typing))
            .await
    }

    pub async fn list_users_in_room(&self, room_id: Uuid) -> Result<Vec<Uuid>> {
        self.presence.users_in_room(room_id).await
    }

    pub async fn is_user_online(&self, user_id: Uuid) -> Result<bool> {
        Ok(!self.presence.rooms_for_user(user_id).await?.is_empty())
    }

    /// Forcibly tears down every one of a user's sessions in a room, e.g. a
    /// moderation action. Emits `UserForcedDisconnect` on the analytics
    /// outbox, matching `websocket.py`'s `disconnect_user`.
    pub async fn disconnect_user_from_room(&self, room_id: Uuid, user_id: Uuid) -> Result<()> {
        let sessions = self.ws_sessions.list_for_user_in_room(user_id, room_id).await?;
        for session in sessions {
            self.disconnect(session.id).await?;
        }

        self.outbox
            .write(
                format!("analytics:{}", AnalyticsEventType::UserForcedDisconnect.as_str()),
                format!(
                    "user_forced_disconnect:{}:{}:{}",
                    room_id,
                    user_id,
                    Utc::now().timestamp_nanos_opt().unwrap_or_default()
                ),
                serde_json::json!({ "room_id": room_id, "user_id": user_id }),
            )
            .await?;

        info!(%room_id, %user_id, "user forcibly disconnected from room");
        Ok(())
    }

    /// Clears every room a user was present in, e.g. on account deletion or
    /// a connection drop without a clean close frame.
    pub async fn cleanup_user(&self, user_id: Uuid) -> Result<()> {
        let rooms = self.presence.cleanup_user(user_id).await?;
        for room_id in rooms {
            self.bus
                .publish(
                    room_id,
                    BroadcastEvent::new(
                        crate::model::BroadcastEventType::PresenceLeft,
                        room_id,
                        serde_json::json!({ "user_id": user_id }),
                    ),
                )
                .await?;
        }
        Ok(())
    }
}
