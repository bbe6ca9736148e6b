use async_trait::async_trait;
use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::relay::BroadcastRouter;
use crate::room::registry::LeaveOutcome;
use crate::shared::AppState;
use crate::websockets::messages::{MessageType, WebSocketMessage};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
pub struct DrawReceiveHandler {
    router: Arc<BroadcastRouter>,
}

impl DrawReceiveHandler {
    pub fn new(router: Arc<BroadcastRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl MessageHandler for DrawReceiveHandler {
    async fn handle_message(&self, conn_id: Uuid, room_id: &str, message: String) {
        debug!(
            conn_id = %conn_id,
            room_id = %room_id,
            message = %message,
            "Received message"
        );

        // Parse message and route the draw event
        match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => match ws_message.message_type {
                MessageType::DrawLine => {
                    self.router.on_line(room_id, conn_id, ws_message.payload).await;
                }
                MessageType::DrawErase => {
                    self.router
                        .on_erase(room_id, conn_id, ws_message.payload)
                        .await;
                }
                MessageType::DrawClear => {
                    self.router.on_clear(room_id, conn_id).await;
                }
                other => {
                    debug!(
                        conn_id = %conn_id,
                        room_id = %room_id,
                        message_type = ?other,
                        "Ignoring server-bound message of outbound-only type"
                    );
                }
            },
            Err(e) => {
                warn!(
                    conn_id = %conn_id,
                    room_id = %room_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
            }
        }
    }
}

/// WebSocket endpoint for joining a drawing room
///
/// GET /ws/:room_id - the room id is chosen by the client and is the only
/// thing it supplies; an unseen id lazily creates the room.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(app_state): State<AppState>,
) -> Response {
    info!(room_id = %room_id, "WebSocket connection requested");

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, room_id, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    room_id: String,
    app_state: AppState,
) {
    let conn_id = Uuid::new_v4();

    info!(
        room_id = %room_id,
        conn_id = %conn_id,
        "WebSocket connection established"
    );

    // Create the outbound channel (registry -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    // Join the room; this lazily creates it and snapshots the replay log
    let outcome = app_state
        .room_registry
        .join(&room_id, conn_id, outbound_sender.clone())
        .await;

    // Send the backlog so the new client can reconstruct the canvas before
    // any relayed event reaches it
    let replay = WebSocketMessage::replay(&outcome.backlog);
    let _ = outbound_sender.send(replay.to_frame());
    debug!(
        room_id = %room_id,
        conn_id = %conn_id,
        records = outcome.backlog.len(),
        "Sent replay backlog to new member"
    );

    let message_handler = Arc::new(DrawReceiveHandler::new(Arc::clone(&app_state.router)));

    let connection = Connection::new(
        conn_id,
        room_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                room_id = %room_id,
                conn_id = %conn_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                room_id = %room_id,
                conn_id = %conn_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Leave the room; the registry deletes it if this was the last member
    match app_state.room_registry.leave(&room_id, conn_id).await {
        LeaveOutcome::RoomDeleted => {
            info!(room_id = %room_id, conn_id = %conn_id, "Room reclaimed after last disconnect");
        }
        LeaveOutcome::Left { remaining } => {
            info!(
                room_id = %room_id,
                conn_id = %conn_id,
                remaining = remaining,
                "Disconnected from room"
            );
        }
        outcome => {
            warn!(
                room_id = %room_id,
                conn_id = %conn_id,
                outcome = ?outcome,
                "Unexpected leave outcome on disconnect"
            );
        }
    }
}
