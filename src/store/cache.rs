use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// A generic key-value cache with per-key TTL, used where the original
/// reaches for a Redis-backed cache (e.g. presence snapshots, rate-limit
/// counters outside this crate's own in-memory rate limiter).
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
