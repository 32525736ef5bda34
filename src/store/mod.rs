//! Store abstractions: narrow, async-trait capability interfaces that every
//! service depends on instead of a concrete database. Each trait has an
//! in-memory reference implementation under `crate::mem` and, for the
//! document-shaped ones, a SQLite-backed implementation under
//! `crate::sqlite`.

mod analytics_sink;
mod cache;
mod join_request_store;
mod lock;
mod membership_store;
mod message_store;
mod notification_store;
mod outbox_store;
mod password_hasher;
mod presence_store;
mod pubsub;
mod room_store;
mod transaction;
mod user_session_store;
mod user_store;
mod ws_session_store;

pub use analytics_sink::AnalyticsSink;
pub use cache::Cache;
pub use join_request_store::JoinRequestStore;
pub use lock::DistributedLock;
pub use membership_store::MembershipStore;
pub use message_store::MessageStore;
pub use notification_store::NotificationStore;
pub use outbox_store::OutboxStore;
pub use password_hasher::PasswordHasher;
pub use presence_store::PresenceStore;
pub use pubsub::PubSubBus;
pub use room_store::RoomStore;
pub use transaction::TransactionRunner;
pub use user_session_store::UserSessionStore;
pub use user_store::UserStore;
pub use ws_session_store::WsSessionStore;
