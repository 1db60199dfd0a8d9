use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Activity log line attached to an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventUpdate {
    pub event_update_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
    pub created_at: chrono::NaiveDateTime,
}
