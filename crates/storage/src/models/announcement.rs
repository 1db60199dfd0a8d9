use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Announcement {
    pub announcement_id: Uuid,
    pub tournament_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: chrono::NaiveDateTime,
}
