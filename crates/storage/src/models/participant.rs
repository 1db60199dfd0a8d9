use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub participant_id: Uuid,
    pub tournament_id: Uuid,
    pub house_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender_division: String,
    pub age_class: String,
    pub created_at: chrono::NaiveDateTime,
}
