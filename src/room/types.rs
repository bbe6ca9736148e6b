use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a live room, as returned by the room listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: String,
    pub member_count: usize,
    pub log_len: usize,
    pub created_at: DateTime<Utc>,
}
