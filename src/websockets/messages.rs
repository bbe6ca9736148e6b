use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::room::models::DrawRecord;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server and Server -> Client (relayed verbatim)
    DrawLine,
    DrawErase,
    DrawClear,

    // Server -> Client only
    Replay,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
///
/// The payload is opaque to the server for draw events; it is stored and
/// relayed verbatim. Inbound messages may omit the payload (a clear has
/// none), in which case it defaults to JSON null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Server -> Client payload carrying the replay backlog for a new joiner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayPayload {
    /// Records in append order since room creation or the last clear.
    pub records: Vec<DrawRecord>,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create a DRAW_LINE message carrying the client's stroke payload
    pub fn draw_line(payload: serde_json::Value) -> Self {
        Self::new(MessageType::DrawLine, payload)
    }

    /// Create a DRAW_ERASE message carrying the client's erase payload
    pub fn draw_erase(payload: serde_json::Value) -> Self {
        Self::new(MessageType::DrawErase, payload)
    }

    /// Create a DRAW_CLEAR message (no payload)
    pub fn draw_clear() -> Self {
        Self::new(MessageType::DrawClear, serde_json::Value::Null)
    }

    /// Create a REPLAY message from a room's backlog
    pub fn replay(records: &[DrawRecord]) -> Self {
        let payload = ReplayPayload {
            records: records.to_vec(),
        };
        Self::new(MessageType::Replay, serde_json::to_value(payload).unwrap())
    }

    /// Serialize to the wire frame. Server-built envelopes contain only
    /// JSON values and string-keyed maps, so this cannot fail.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
