use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::models::DrawRecord;
use super::types::RoomSummary;
use crate::shared::{AppError, AppState};

/// HTTP handler for listing all live rooms
///
/// GET /rooms
/// Returns id, member count, log length and creation time per room.
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomSummary>>, AppError> {
    let rooms = state.room_registry.list_rooms().await;

    info!(room_count = rooms.len(), "Rooms listed");

    Ok(Json(rooms))
}

/// HTTP handler for inspecting a room's replay log
///
/// GET /rooms/:room_id/log
/// Returns the ordered records accumulated since creation or the last clear.
#[instrument(name = "get_room_log", skip(state))]
pub async fn get_room_log(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<DrawRecord>>, AppError> {
    let log = state
        .room_registry
        .snapshot(&room_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("room {} not found", room_id)))?;

    info!(room_id = %room_id, log_len = log.len(), "Room log fetched");

    Ok(Json(log))
}
