use async_trait::async_trait;

use crate::error::Result;

use super::protocol::ClientFrame;

/// Decouples the per-connection loop from any concrete socket or web
/// framework. The HTTP/WS upgrade itself is out of scope here (the same
/// boundary the teacher draws between `routes/stream.rs` and
/// `events::EventBus`); a real edge implements this over its socket type,
/// tests implement it over an in-memory channel pair.
#[async_trait]
pub trait WsTransport: Send {
    async fn send(&mut self, text: String) -> Result<()>;

    /// `None` signals the peer closed the connection (or it's otherwise
    /// gone); `Some(Err(_))` signals a transport-level error on an
    /// otherwise still-open connection.
    async fn recv(&mut self) -> Option<Result<ClientFrame>>;
}
