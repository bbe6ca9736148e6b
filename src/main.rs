use axum::{routing::get, Router};
use scrawl::room::handlers::{get_room_log, list_rooms};
use scrawl::shared::AppState;
use scrawl::websockets::websocket_handler;
use scrawl::InMemoryRoomRegistry;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrawl=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scrawl drawing relay");

    let app_state = AppState::new(Arc::new(InMemoryRoomRegistry::new()));

    let app = Router::new()
        .route("/", get(|| async { "scrawl relay up" }))
        .route("/rooms", get(list_rooms))
        .route("/rooms/:room_id/log", get(get_room_log))
        .route("/ws/:room_id", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = std::env::var("SCRAWL_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!(addr = %addr, "Listening");
    axum::serve(listener, app).await.unwrap();
}
