//! In-memory reference implementations of every store trait. Backed by
//! `dashmap` for lock-free concurrent access, in the manner of the
//! teacher's `PresenceTracker`/`RateLimiter` shared state and
//! `wsprism-gateway`'s `Presence`/`RealtimeCore`.

mod analytics_sink;
mod join_request_store;
mod lock;
mod membership_store;
mod message_store;
mod notification_store;
mod outbox_store;
mod presence_store;
mod pubsub;
mod room_store;
mod transaction;
mod user_session_store;
mod user_store;
mod ws_session_store;

pub use analytics_sink::InMemoryAnalyticsSink;
pub use join_request_store::InMemoryJoinRequestStore;
pub use lock::InMemoryDistributedLock;
pub use membership_store::InMemoryMembershipStore;
pub use message_store::InMemoryMessageStore;
pub use notification_store::InMemoryNotificationStore;
pub use outbox_store::InMemoryOutboxStore;
pub use presence_store::InMemoryPresenceStore;
pub use pubsub::InMemoryPubSubBus;
pub use room_store::InMemoryRoomStore;
pub use transaction::NoopTransactionRunner;
pub use user_session_store::InMemoryUserSessionStore;
pub use user_store::InMemoryUserStore;
pub use ws_session_store::InMemoryWsSessionStore;
