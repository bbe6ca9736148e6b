// Library crate for the scrawl drawing relay server
// This file exposes the public API for integration tests

pub mod relay;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use relay::BroadcastRouter;
pub use room::models::{DrawRecord, Room, StrokeKind};
pub use room::registry::{
    InMemoryRoomRegistry, JoinOutcome, LeaveOutcome, RelayOutcome, RoomRegistry,
};
pub use shared::{AppError, AppState};
pub use websockets::{DrawReceiveHandler, MessageHandler, MessageType, WebSocketMessage};
