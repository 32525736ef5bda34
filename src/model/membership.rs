use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's participation in a room. The pair `(room_id, user_id)` is the
/// natural key; stores must treat re-adding an existing membership as a
/// no-op rather than an error (see `RoomService::_add_participant`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Membership {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(room_id: Uuid, user_id: Uuid) -> Self {
        Self {
            room_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}
