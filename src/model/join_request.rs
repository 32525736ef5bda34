use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinRequest {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl JoinRequest {
    pub fn new(room_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            status: JoinRequestStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
