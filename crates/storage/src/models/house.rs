use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct House {
    pub house_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}
