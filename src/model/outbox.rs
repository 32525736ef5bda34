use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    Pending,
    InProgress,
    Sent,
    Failed,
}

/// A transactional-outbox entry. `dedup_key` is unique per store and makes
/// re-insertion from the repair job idempotent.
///
/// `in_progress_until` is the one addition this crate makes on top of the
/// original dataclass: a lease expiry stamped by the worker when it claims
/// an entry. A worker cycle that starts by re-arming any `IN_PROGRESS` row
/// whose lease has passed back to `PENDING` is what keeps a crashed worker
/// from stranding entries forever (see the outbox worker module).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outbox {
    pub id: Uuid,
    pub event_type: String,
    pub dedup_key: String,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub retries: u32,
    pub max_retries: u32,
    pub last_error: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub in_progress_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Outbox {
    pub fn new(
        event_type: impl Into<String>,
        dedup_key: impl Into<String>,
        payload: serde_json::Value,
        max_retries: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            dedup_key: dedup_key.into(),
            payload,
            status: OutboxStatus::Pending,
            retries: 0,
            max_retries,
            last_error: None,
            sent_at: None,
            in_progress_until: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.retries >= self.max_retries
    }
}
