// Public API
pub use handler::{websocket_handler, DrawReceiveHandler};
pub use messages::{MessageType, ReplayPayload, WebSocketMessage};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod handler;
pub mod messages;
mod socket;
