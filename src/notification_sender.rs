use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::BroadcastEvent;
use crate::store::PubSubBus;

/// Delivers a notification-family outbox entry to its destination. The
/// sole implementation here fans it out over the recipient's room
/// channel(s) on the pub/sub bus, in place of the original's direct
/// WebSocket push (`websocket_sender.py`) — this crate has no socket of
/// its own to hold open, so delivery means "publish, and whatever
/// `WsTransport` loop is listening picks it up."
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, user_id: Uuid, payload: serde_json::Value) -> Result<()>;
}

/// Publishes directly to a per-user channel on the bus, addressed the same
/// way a room channel is (the `PubSubBus` trait is channel-shaped, not
/// room-shaped, even though every other caller keys it by room id).
pub struct PubSubNotificationSender<B: PubSubBus> {
    bus: std::sync::Arc<B>,
}

impl<B: PubSubBus> PubSubNotificationSender<B> {
    pub fn new(bus: std::sync::Arc<B>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl<B: PubSubBus> NotificationSender for PubSubNotificationSender<B> {
    async fn send(&self, user_id: Uuid, payload: serde_json::Value) -> Result<()> {
        let event = BroadcastEvent::new(
            crate::model::BroadcastEventType::NotificationDelivered,
            user_id,
            payload,
        );
        self.bus.publish(user_id, event).await
    }
}
