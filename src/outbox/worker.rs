use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::model::{AnalyticsEvent, AnalyticsEventType, OutboxStatus};
use crate::notification_sender::NotificationSender;
use crate::store::{AnalyticsSink, DistributedLock, OutboxStore};

const WORKER_LOCK_KEY: &str = "outbox_worker";

/// Drains `PENDING` outbox entries, dispatching each to the analytics sink
/// or the notification sender depending on its event type, and tracking
/// delivery success with retries up to `max_retries`.
///
/// Gated by a `DistributedLock` so only one worker in a cluster runs a
/// cycle at a time (`tasks.py`'s non-blocking Redis lock). Each cycle
/// first re-arms any `IN_PROGRESS` entry whose lease has expired — the fix
/// for entries a crashed worker would otherwise strand forever.
pub struct OutboxWorker<O, L, A, N> {
    outbox: Arc<O>,
    lock: Arc<L>,
    analytics: Arc<A>,
    notifications: Arc<N>,
    config: EngineConfig,
}

impl<O, L, A, N> OutboxWorker<O, L, A, N>
where
    O: OutboxStore + 'static,
    L: DistributedLock + 'static,
    A: AnalyticsSink + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(outbox: Arc<O>, lock: Arc<L>, analytics: Arc<A>, notifications: Arc<N>, config: EngineConfig) -> Self {
        Self {
            outbox,
            lock,
            analytics,
            notifications,
            config,
        }
    }

    /// Spawns the background loop. Mirrors the teacher's
    /// `spawn_retention_task`: an initial startup delay, then a fixed
    /// interval sleep between cycles, forever.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            loop {
                if let Err(err) = self.run_cycle().await {
                    error!(error = %err, "outbox worker cycle failed");
                }
                tokio::time::sleep(Duration::from_secs(self.config.outbox_worker_interval_secs)).await;
            }
        })
    }

    pub async fn run_cycle(&self) -> crate::error::Result<()> {
        let Some(guard) = self
            .lock
            .try_acquire(WORKER_LOCK_KEY, self.config.outbox_worker_lease())
            .await?
        else {
            return Ok(());
        };

        let now = Utc::now();
        let expired = self.outbox.list_expired_leases(now).await?;
        for entry in &expired {
            warn!(outbox_id = %entry.id, "reclaiming expired outbox lease");
            self.outbox.requeue(entry.id).await?;
        }

        let pending = self
            .outbox
            .list_pending(self.config.outbox_worker_batch_size)
            .await?;

        for entry in pending {
            let lease_until = Utc::now() + chrono::Duration::seconds(self.config.outbox_worker_lock_timeout_secs as i64);
            if !self.outbox.try_claim(entry.id, lease_until).await? {
                continue;
            }

            let dispatch = self.dispatch(entry.id, &entry.event_type, entry.payload.clone()).await;
            match dispatch {
                Ok(()) => {
                    self.outbox.mark_sent(entry.id, Utc::now()).await?;
                }
                Err(err) => {
                    let next_retries = entry.retries + 1;
                    let status = if next_retries >= entry.max_retries {
                        OutboxStatus::Failed
                    } else {
                        OutboxStatus::Pending
                    };
                    self.outbox.mark_failed(entry.id, status, err.to_string()).await?;
                }
            }
        }

        guard.release().await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        outbox_id: Uuid,
        event_type: &str,
        payload: serde_json::Value,
    ) -> crate::error::Result<()> {
        if let Some(analytics_type) = event_type.strip_prefix("analytics:") {
            let event_type = parse_analytics_event_type(analytics_type);
            self.analytics.record(AnalyticsEvent::new(event_type, payload)).await?;
        } else if let Some(rest) = event_type.strip_prefix("notification:") {
            let _ = rest;
            let user_id = payload
                .get("user_id")
                .and_then(|v| v.as_str())
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| crate::error::ChatError::Transport("notification payload missing user_id".into()))?;
            self.notifications.send(user_id, payload).await?;
        } else {
            info!(outbox_id = %outbox_id, event_type, "no dispatcher for outbox event type, marking sent");
        }
        Ok(())
    }
}

fn parse_analytics_event_type(s: &str) -> AnalyticsEventType {
    match s {
        "user_registered" => AnalyticsEventType::UserRegistered,
        "user_login" => AnalyticsEventType::UserLoggedIn,
        "user_logout" => AnalyticsEventType::UserLoggedOut,
        "user_deleted" => AnalyticsEventType::UserDeleted,
        "user_joined_room" => AnalyticsEventType::UserJoinedRoom,
        "user_left_room" => AnalyticsEventType::UserLeftRoom,
        "user_connected" => AnalyticsEventType::UserConnected,
        "user_disconnected" => AnalyticsEventType::UserDisconnected,
        "user_forced_disconnect" => AnalyticsEventType::UserForcedDisconnect,
        "room_created" => AnalyticsEventType::RoomCreated,
        "room_updated" => AnalyticsEventType::RoomUpdated,
        "room_deleted" => AnalyticsEventType::RoomDeleted,
        "join_request_created" => AnalyticsEventType::JoinRequestCreated,
        "join_request_accepted" => AnalyticsEventType::JoinRequestAccepted,
        "notification_read" => AnalyticsEventType::NotificationRead,
        "notifications_all_read" => AnalyticsEventType::NotificationsAllRead,
        "message_edited" => AnalyticsEventType::MessageEdited,
        "message_deleted" => AnalyticsEventType::MessageDeleted,
        _ => AnalyticsEventType::MessageSent,
    }
}
