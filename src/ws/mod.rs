mod loop_;
mod protocol;
mod transport;

pub use loop_::run_connection;
pub use protocol::{ClientFrame, ServerFrame};
pub use transport::WsTransport;
