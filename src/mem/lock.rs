use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::store::{DistributedLock, LockGuard};

/// TTL-based lock keyed by name, held in a shared map. Stands in for a
/// Redis `SET key val NX PX ttl` lock within a single process.
#[derive(Default)]
pub struct InMemoryDistributedLock {
    held_until: Arc<DashMap<String, Instant>>,
}

impl InMemoryDistributedLock {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DistributedLock for InMemoryDistributedLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<Box<dyn LockGuard>>> {
        let now = Instant::now();
        let mut acquired = false;
        self.held_until
            .entry(key.to_string())
            .and_modify(|expiry| {
                if *expiry <= now {
                    *expiry = now + ttl;
                    acquired = true;
                }
            })
            .or_insert_with(|| {
                acquired = true;
                now + ttl
            });

        if !acquired {
            return Ok(None);
        }
        Ok(Some(Box::new(InMemoryLockGuard {
            key: key.to_string(),
            held_until: self.held_until.clone(),
        })))
    }
}

struct InMemoryLockGuard {
    key: String,
    held_until: Arc<DashMap<String, Instant>>,
}

#[async_trait]
impl LockGuard for InMemoryLockGuard {
    async fn release(self: Box<Self>) -> Result<()> {
        self.held_until.remove(&self.key);
        Ok(())
    }
}
