//! SQLite-backed implementations of the document-shaped stores, grounded
//! on the teacher's `db.rs` connection/migration pattern. Kept deliberately
//! synchronous inside each `async_trait` method body, the same way the
//! teacher's Rocket handlers call straight into `Mutex<Connection>`
//! without an executor hop.

mod db;
mod join_request_store;
mod membership_store;
mod notification_store;
mod outbox_store;
mod room_store;
mod transaction;
mod user_store;

pub use db::Db;
pub use join_request_store::SqliteJoinRequestStore;
pub use membership_store::SqliteMembershipStore;
pub use notification_store::SqliteNotificationStore;
pub use outbox_store::SqliteOutboxStore;
pub use room_store::SqliteRoomStore;
pub use transaction::SqliteTransactionRunner;
pub use user_store::SqliteUserStore;
