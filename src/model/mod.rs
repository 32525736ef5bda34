//! Domain entities shared by every store and service.

mod analytics;
mod event;
mod join_request;
mod membership;
mod message;
mod notification;
mod outbox;
mod room;
mod session;
mod user;

pub use analytics::{AnalyticsEvent, AnalyticsEventType};
pub use event::{BroadcastEvent, BroadcastEventType};
pub use join_request::{JoinRequest, JoinRequestStatus};
pub use membership::Membership;
pub use message::Message;
pub use notification::{Notification, NotificationType};
pub use outbox::{Outbox, OutboxStatus};
pub use room::{Room, RoomVisibility};
pub use session::{UserSession, WsSession};
pub use user::User;
