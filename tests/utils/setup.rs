#![allow(dead_code)] // Test utilities may not all be used in every test

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

use scrawl::{
    BroadcastRouter, DrawReceiveHandler, InMemoryRoomRegistry, LeaveOutcome, MessageHandler,
    MessageType, RoomRegistry, WebSocketMessage,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// One simulated joined client: its connection id, the room it is pinned to,
/// and the receiving end of its outbound channel.
pub struct TestClient {
    pub conn_id: Uuid,
    pub room_id: String,
    outbound: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl TestClient {
    /// Drains and parses every frame currently enqueued for this client.
    pub fn drain(&self) -> Vec<WebSocketMessage> {
        let mut outbound = self.outbound.lock().unwrap();
        let mut messages = vec![];
        while let Ok(frame) = outbound.try_recv() {
            messages.push(serde_json::from_str(&frame).expect("client received malformed frame"));
        }
        messages
    }

    /// Drains frames and asserts none were enqueued.
    pub fn assert_received_nothing(&self) {
        let messages = self.drain();
        assert!(
            messages.is_empty(),
            "client should not have received messages, got {:?}",
            messages
        );
    }
}

/// Drives the relay the way a live server does: inbound frames go through
/// the receive handler's parse-and-route path, outbound frames land in each
/// client's channel.
pub struct TestSetup {
    pub registry: Arc<InMemoryRoomRegistry>,
    pub router: Arc<BroadcastRouter>,
    handler: DrawReceiveHandler,
    clients: HashMap<String, TestClient>,
}

impl TestSetup {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let router = Arc::new(BroadcastRouter::new(
            Arc::clone(&registry) as Arc<dyn RoomRegistry>
        ));
        let handler = DrawReceiveHandler::new(Arc::clone(&router));
        Self {
            registry,
            router,
            handler,
            clients: HashMap::new(),
        }
    }

    /// Connects a named client to a room: joins the registry and delivers
    /// the replay backlog, mirroring the WebSocket upgrade path.
    pub async fn connect(&mut self, name: &str, room_id: &str) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let outcome = self.registry.join(room_id, conn_id, tx.clone()).await;
        let replay = WebSocketMessage::replay(&outcome.backlog);
        let _ = tx.send(replay.to_frame());

        self.clients.insert(
            name.to_string(),
            TestClient {
                conn_id,
                room_id: room_id.to_string(),
                outbound: Mutex::new(rx),
            },
        );
    }

    /// Disconnects a named client, returning the leave outcome.
    pub async fn disconnect(&mut self, name: &str) -> LeaveOutcome {
        let client = self.clients.remove(name).expect("unknown test client");
        self.registry.leave(&client.room_id, client.conn_id).await
    }

    pub fn client(&self, name: &str) -> &TestClient {
        self.clients.get(name).expect("unknown test client")
    }

    /// Discards everything queued so far for every connected client.
    pub fn drain_all(&self) {
        for client in self.clients.values() {
            client.drain();
        }
    }

    pub async fn send_line(&self, name: &str, payload: serde_json::Value) {
        self.send_frame(
            name,
            serde_json::json!({"type": "DRAW_LINE", "payload": payload}),
        )
        .await;
    }

    pub async fn send_erase(&self, name: &str, payload: serde_json::Value) {
        self.send_frame(
            name,
            serde_json::json!({"type": "DRAW_ERASE", "payload": payload}),
        )
        .await;
    }

    pub async fn send_clear(&self, name: &str) {
        self.send_frame(name, serde_json::json!({"type": "DRAW_CLEAR"}))
            .await;
    }

    async fn send_frame(&self, name: &str, frame: serde_json::Value) {
        let client = self.client(name);
        self.handler
            .handle_message(client.conn_id, &client.room_id, frame.to_string())
            .await;
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

pub fn message_types(messages: &[WebSocketMessage]) -> Vec<MessageType> {
    messages.iter().map(|m| m.message_type).collect()
}
