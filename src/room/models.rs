use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Which kind of stroke a stored record represents.
///
/// `clear` is not a record kind: it resets the log and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    Line,
    Erase,
}

/// One entry of a room's replay log.
///
/// The payload is whatever the drawing client sent (coordinates, color,
/// stroke width, ...) and is stored verbatim. The kind tag is kept so the
/// replay sent to late joiners can be applied stroke-by-stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub kind: StrokeKind,
    pub payload: serde_json::Value,
}

impl DrawRecord {
    pub fn line(payload: serde_json::Value) -> Self {
        Self {
            kind: StrokeKind::Line,
            payload,
        }
    }

    pub fn erase(payload: serde_json::Value) -> Self {
        Self {
            kind: StrokeKind::Erase,
            payload,
        }
    }
}

/// In-memory state of one live room: the connections currently joined and
/// the ordered replay log accumulated since creation or the last clear.
///
/// Members map connection id to that connection's outbound channel, so a
/// relay can enqueue to every peer while the registry's exclusive section
/// is held. Rooms live only inside the registry table.
#[derive(Debug)]
pub struct Room {
    members: HashMap<Uuid, mpsc::UnboundedSender<String>>,
    log: Vec<DrawRecord>,
    created_at: DateTime<Utc>,
}

impl Room {
    /// Creates an empty room: no members, no log entries.
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
            log: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_member(&mut self, conn_id: Uuid, sender: mpsc::UnboundedSender<String>) {
        self.members.insert(conn_id, sender);
    }

    /// Removes a member, returning whether it was present.
    pub fn remove_member(&mut self, conn_id: &Uuid) -> bool {
        self.members.remove(conn_id).is_some()
    }

    pub fn has_member(&self, conn_id: &Uuid) -> bool {
        self.members.contains_key(conn_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn append(&mut self, record: DrawRecord) {
        self.log.push(record);
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn log(&self) -> &[DrawRecord] {
        &self.log
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Enqueues a serialized frame to every member except `origin`.
    ///
    /// A member whose channel is already closed is skipped; delivery is
    /// fire-and-forget and never retried. Returns how many peers the frame
    /// was enqueued to.
    pub fn relay_except(&self, origin: &Uuid, frame: &str) -> usize {
        let mut delivered = 0;
        for (conn_id, sender) in &self.members {
            if conn_id == origin {
                continue;
            }
            if sender.send(frame.to_string()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
