use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// A held lock. Dropping it is not a release by itself — the lock expires
/// by TTL regardless, matching a Redis `SET NX PX` lock rather than a
/// local `Mutex` guard; callers that finish early should call `release`.
#[async_trait]
pub trait LockGuard: Send {
    async fn release(self: Box<Self>) -> Result<()>;
}

/// Non-blocking, TTL-based distributed lock gating singleton-per-cluster
/// background jobs (the outbox worker and the outbox repair job), so a
/// multi-instance deployment runs exactly one of each at a time. Grounded
/// on `tasks.py`'s `redis_client.lock(..., blocking=False)` /
/// `LockError`-to-skip pattern.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Attempts to acquire `key` for `ttl`. Returns `None` immediately if
    /// already held, rather than blocking.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<Box<dyn LockGuard>>>;
}
