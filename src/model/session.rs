use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logged-in HTTP/cookie session. Sliding TTL: a read within
/// `refresh_threshold` of `expires_at` pushes `expires_at` back out to the
/// full TTL (see `UserSessionStore::touch`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub connected_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            connected_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// One open WebSocket connection for a user in a room. A user may hold more
/// than one concurrent `WsSession` (multiple tabs/devices).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WsSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub connected_at: DateTime<Utc>,
    pub last_ping_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl WsSession {
    pub fn new(user_id: Uuid, room_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            room_id,
            connected_at: now,
            last_ping_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
