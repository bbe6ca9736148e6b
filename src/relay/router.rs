use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::room::models::DrawRecord;
use crate::room::registry::{RelayOutcome, RoomRegistry};
use crate::websockets::messages::WebSocketMessage;

/// Routes inbound draw events through their room: appends to the replay log
/// and relays to every member except the originator.
///
/// The outbound frame is serialized once per event, not once per peer, and
/// handed to the registry so log append and peer enqueue happen inside the
/// room's exclusive section.
pub struct BroadcastRouter {
    registry: Arc<dyn RoomRegistry>,
}

impl BroadcastRouter {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Handles a `DRAW_LINE` event: append the stroke, relay to peers.
    pub async fn on_line(
        &self,
        room_id: &str,
        origin: Uuid,
        payload: serde_json::Value,
    ) -> RelayOutcome {
        let message = WebSocketMessage::draw_line(payload.clone());
        self.append(room_id, origin, DrawRecord::line(payload), message)
            .await
    }

    /// Handles a `DRAW_ERASE` event: append the erasure, relay to peers.
    pub async fn on_erase(
        &self,
        room_id: &str,
        origin: Uuid,
        payload: serde_json::Value,
    ) -> RelayOutcome {
        let message = WebSocketMessage::draw_erase(payload.clone());
        self.append(room_id, origin, DrawRecord::erase(payload), message)
            .await
    }

    /// Handles a `DRAW_CLEAR` event: reset the room's log, relay to peers.
    pub async fn on_clear(&self, room_id: &str, origin: Uuid) -> RelayOutcome {
        let frame = WebSocketMessage::draw_clear().to_frame();

        debug!(room_id = %room_id, origin = %origin, "Routing clear event");
        self.registry.clear_and_relay(room_id, origin, &frame).await
    }

    async fn append(
        &self,
        room_id: &str,
        origin: Uuid,
        record: DrawRecord,
        message: WebSocketMessage,
    ) -> RelayOutcome {
        let frame = message.to_frame();

        debug!(
            room_id = %room_id,
            origin = %origin,
            kind = ?record.kind,
            "Routing draw event"
        );
        self.registry
            .append_and_relay(room_id, origin, record, &frame)
            .await
    }
}
