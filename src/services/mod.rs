mod message_service;
mod notification_service;
mod room_service;
mod user_service;
mod websocket_service;

pub use message_service::MessageService;
pub use notification_service::NotificationService;
pub use room_service::RoomService;
pub use user_service::UserService;
pub use websocket_service::WebSocketService;
