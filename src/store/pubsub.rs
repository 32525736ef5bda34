use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::BroadcastEvent;

/// A subscription handle. Dropping it unsubscribes.
#[async_trait]
pub trait PubSubSubscription: Send {
    async fn recv(&mut self) -> Result<BroadcastEvent>;
}

/// Per-room publish/subscribe fan-out. Generalizes the teacher's single
/// global `EventBus` (one `broadcast::Sender<ChatEvent>` for the whole
/// server) into one channel per room, so a connection only ever receives
/// events for rooms it has joined.
#[async_trait]
pub trait PubSubBus: Send + Sync {
    async fn publish(&self, room_id: Uuid, event: BroadcastEvent) -> Result<()>;
    async fn subscribe(&self, room_id: Uuid) -> Result<Box<dyn PubSubSubscription>>;
}
