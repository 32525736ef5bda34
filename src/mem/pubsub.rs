use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::model::BroadcastEvent;
use crate::store::{PubSubBus, PubSubSubscription};

const CHANNEL_CAPACITY: usize = 256;

/// One `broadcast` channel per room, created lazily on first publish or
/// subscribe. Generalizes the teacher's single process-wide `EventBus`.
#[derive(Default)]
pub struct InMemoryPubSubBus {
    channels: DashMap<Uuid, broadcast::Sender<BroadcastEvent>>,
}

impl InMemoryPubSubBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, room_id: Uuid) -> broadcast::Sender<BroadcastEvent> {
        self.channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl PubSubBus for InMemoryPubSubBus {
    async fn publish(&self, room_id: Uuid, event: BroadcastEvent) -> Result<()> {
        // No receivers yet is not an error: a room with nobody connected
        // simply drops the event, same as a Rocket `EventStream` with no
        // open SSE connections.
        let _ = self.channel(room_id).send(event);
        Ok(())
    }

    async fn subscribe(&self, room_id: Uuid) -> Result<Box<dyn PubSubSubscription>> {
        let receiver = self.channel(room_id).subscribe();
        Ok(Box::new(BroadcastSubscription { receiver }))
    }
}

struct BroadcastSubscription {
    receiver: broadcast::Receiver<BroadcastEvent>,
}

#[async_trait]
impl PubSubSubscription for BroadcastSubscription {
    async fn recv(&mut self) -> Result<BroadcastEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Ok(event),
                // A slow subscriber that lagged past the channel capacity:
                // skip ahead rather than failing the whole connection.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(ChatError::Transport("pubsub channel closed".into()));
                }
            }
        }
    }
}
