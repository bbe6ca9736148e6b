use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::models::{DrawRecord, Room};
use super::types::RoomSummary;

/// Result of joining a room.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Whether this join created the room (first member of an unseen id).
    pub created: bool,
    /// Snapshot of the replay log at join time, in append order. Empty for
    /// a freshly created room.
    pub backlog: Vec<DrawRecord>,
}

/// Result of leaving a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Member removed; the room still has `remaining` members.
    Left { remaining: usize },
    /// Member removed and it was the last one, so the room was deleted.
    RoomDeleted,
    /// The connection was not a member of the room.
    NotAMember,
    /// No room with that id exists.
    RoomNotFound,
}

/// Result of relaying a draw event through a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Event applied to the log and enqueued to `peers` members.
    Relayed { peers: usize },
    /// No room with that id exists; the event was dropped.
    RoomNotFound,
}

/// Shared room table: membership, replay logs, and room lifecycle.
///
/// Every mutation on a given room is serialized against every other one,
/// including the "remove member, then delete if empty" sequence on leave.
/// Relay operations enqueue to peers inside the same exclusive section that
/// appends to the log, which is what makes per-peer delivery order match
/// log order.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Adds a connection to a room, creating the room if this is the first
    /// join of that id. Returns the replay backlog for the new member.
    async fn join(
        &self,
        room_id: &str,
        conn_id: Uuid,
        sender: mpsc::UnboundedSender<String>,
    ) -> JoinOutcome;

    /// Removes a connection from its room. Deleting the room when the last
    /// member leaves happens here, under the same exclusive section as the
    /// removal, so a concurrent join can never be lost.
    async fn leave(&self, room_id: &str, conn_id: Uuid) -> LeaveOutcome;

    /// Appends a record to the room's log and enqueues the serialized frame
    /// to every member except `origin`.
    async fn append_and_relay(
        &self,
        room_id: &str,
        origin: Uuid,
        record: DrawRecord,
        frame: &str,
    ) -> RelayOutcome;

    /// Resets the room's log and enqueues the serialized frame to every
    /// member except `origin`.
    async fn clear_and_relay(&self, room_id: &str, origin: Uuid, frame: &str) -> RelayOutcome;

    /// Copy of a room's replay log, if the room exists.
    async fn snapshot(&self, room_id: &str) -> Option<Vec<DrawRecord>>;

    /// Summaries of all live rooms.
    async fn list_rooms(&self) -> Vec<RoomSummary>;
}

/// In-memory registry: one process-wide table, lifecycle = process uptime.
/// Nothing survives a restart; that is an accepted limitation, not a bug.
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<String, Room>>,
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self, sender))]
    async fn join(
        &self,
        room_id: &str,
        conn_id: Uuid,
        sender: mpsc::UnboundedSender<String>,
    ) -> JoinOutcome {
        let mut rooms = self.rooms.lock().unwrap();

        let created = !rooms.contains_key(room_id);
        let room = rooms.entry(room_id.to_string()).or_insert_with(Room::new);
        let backlog = room.log().to_vec();
        room.add_member(conn_id, sender);

        info!(
            room_id = %room_id,
            conn_id = %conn_id,
            created = created,
            member_count = room.member_count(),
            backlog_len = backlog.len(),
            "Connection joined room"
        );

        JoinOutcome { created, backlog }
    }

    #[instrument(skip(self))]
    async fn leave(&self, room_id: &str, conn_id: Uuid) -> LeaveOutcome {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, conn_id = %conn_id, "Leave for unknown room");
                return LeaveOutcome::RoomNotFound;
            }
        };

        if !room.remove_member(&conn_id) {
            debug!(room_id = %room_id, conn_id = %conn_id, "Leave for non-member");
            return LeaveOutcome::NotAMember;
        }

        // Emptiness is checked under the same lock as the removal; a join
        // that raced this leave either landed before (room stays) or lands
        // after on a fresh entry.
        if room.is_empty() {
            rooms.remove(room_id);
            info!(room_id = %room_id, conn_id = %conn_id, "Last member left, room deleted");
            return LeaveOutcome::RoomDeleted;
        }

        let remaining = room.member_count();
        info!(
            room_id = %room_id,
            conn_id = %conn_id,
            remaining = remaining,
            "Connection left room"
        );
        LeaveOutcome::Left { remaining }
    }

    #[instrument(skip(self, record, frame))]
    async fn append_and_relay(
        &self,
        room_id: &str,
        origin: Uuid,
        record: DrawRecord,
        frame: &str,
    ) -> RelayOutcome {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                warn!(room_id = %room_id, origin = %origin, "Draw event for unknown room dropped");
                return RelayOutcome::RoomNotFound;
            }
        };

        room.append(record);
        let peers = room.relay_except(&origin, frame);

        debug!(
            room_id = %room_id,
            origin = %origin,
            peers = peers,
            log_len = room.log().len(),
            "Record appended and relayed"
        );
        RelayOutcome::Relayed { peers }
    }

    #[instrument(skip(self, frame))]
    async fn clear_and_relay(&self, room_id: &str, origin: Uuid, frame: &str) -> RelayOutcome {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                warn!(room_id = %room_id, origin = %origin, "Clear for unknown room dropped");
                return RelayOutcome::RoomNotFound;
            }
        };

        room.clear_log();
        let peers = room.relay_except(&origin, frame);

        debug!(room_id = %room_id, origin = %origin, peers = peers, "Log cleared and relayed");
        RelayOutcome::Relayed { peers }
    }

    #[instrument(skip(self))]
    async fn snapshot(&self, room_id: &str) -> Option<Vec<DrawRecord>> {
        let rooms = self.rooms.lock().unwrap();
        rooms.get(room_id).map(|room| room.log().to_vec())
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .iter()
            .map(|(id, room)| RoomSummary {
                id: id.clone(),
                member_count: room.member_count(),
                log_len: room.log().len(),
                created_at: room.created_at(),
            })
            .collect()
    }
}
