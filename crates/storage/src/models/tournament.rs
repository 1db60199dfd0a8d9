use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub name: String,
    pub venue: Option<String>,
    pub event_date: chrono::NaiveDate,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}
