//! Engine configuration, read from environment variables with sensible
//! defaults. Mirrors `rate_limit::RateLimitConfig::from_env` in shape: one
//! field per "Recognized configuration option" named in the spec.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cookie + KV TTL for `UserSession`.
    pub user_session_ttl_secs: u64,
    /// Sliding-TTL refresh threshold: a read with remaining TTL below this
    /// extends the session back to the full TTL.
    pub user_session_refresh_threshold_secs: u64,
    /// KV TTL for `WSSession`.
    pub web_socket_session_ttl_secs: u64,

    /// Lease TTL for the outbox worker's distributed lock.
    pub outbox_worker_lock_timeout_secs: u64,
    /// Lease TTL for the outbox repair job's distributed lock.
    pub outbox_repair_lock_timeout_secs: u64,
    /// Cadence at which the outbox worker's scheduler fires.
    pub outbox_worker_interval_secs: u64,
    /// Cadence at which the outbox repair job's scheduler fires.
    pub outbox_repair_interval_secs: u64,

    /// Max PENDING entries drained per outbox worker cycle.
    pub outbox_worker_batch_size: usize,
    /// Terminal retry count for an outbox entry.
    pub outbox_max_retries: u32,
    /// Base delay before a failed-but-retryable outbox entry is retried.
    pub outbox_retry_delay_secs: u64,

    /// Repair job reconciliation window, in minutes.
    pub outbox_repair_window_minutes: i64,
    /// Repair job page size.
    pub outbox_repair_batch_size: usize,
    /// Delay between repair job batches, to yield.
    pub outbox_repair_inter_batch_delay_ms: u64,

    /// Heartbeat period for an open WebSocket loop.
    pub ws_heartbeat_interval_secs: u64,
    /// Backoff after a non-fatal heartbeat failure.
    pub ws_heartbeat_backoff_secs: u64,
    /// Poll granularity for pub/sub `recv`, so a loop stays responsive to
    /// its cancellation signal.
    pub ws_pubsub_poll_interval_millis: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_session_ttl_secs: 3600,
            user_session_refresh_threshold_secs: 600,
            web_socket_session_ttl_secs: 300,

            outbox_worker_lock_timeout_secs: 300,
            outbox_repair_lock_timeout_secs: 300,
            outbox_worker_interval_secs: 60,
            outbox_repair_interval_secs: 60,

            outbox_worker_batch_size: 100,
            outbox_max_retries: 5,
            outbox_retry_delay_secs: 30,

            outbox_repair_window_minutes: 3,
            outbox_repair_batch_size: 200,
            outbox_repair_inter_batch_delay_ms: 100,

            ws_heartbeat_interval_secs: 30,
            ws_heartbeat_backoff_secs: 5,
            ws_pubsub_poll_interval_millis: 1000,
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, falling back to defaults for any
    /// variable that is unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("USER_SESSION_TTL_SECONDS")
            && let Ok(n) = v.parse()
        {
            config.user_session_ttl_secs = n;
        }
        if let Ok(v) = env::var("WEB_SOCKET_SESSION_TTL_SECONDS")
            && let Ok(n) = v.parse()
        {
            config.web_socket_session_ttl_secs = n;
        }
        if let Ok(v) = env::var("OUTBOX_WORKER_LOCK_TIMEOUT")
            && let Ok(n) = v.parse()
        {
            config.outbox_worker_lock_timeout_secs = n;
        }
        if let Ok(v) = env::var("OUTBOX_REPAIR_LOCK_TIMEOUT")
            && let Ok(n) = v.parse()
        {
            config.outbox_repair_lock_timeout_secs = n;
        }
        if let Ok(v) = env::var("CELERY_SCHEDULE")
            && let Ok(n) = v.parse()
        {
            config.outbox_worker_interval_secs = n;
            config.outbox_repair_interval_secs = n;
        }

        config
    }

    pub fn user_session_ttl(&self) -> Duration {
        Duration::from_secs(self.user_session_ttl_secs)
    }

    pub fn web_socket_session_ttl(&self) -> Duration {
        Duration::from_secs(self.web_socket_session_ttl_secs)
    }

    pub fn outbox_worker_lease(&self) -> Duration {
        Duration::from_secs(self.outbox_worker_lock_timeout_secs)
    }
}
