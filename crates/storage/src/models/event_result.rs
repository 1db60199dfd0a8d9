use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One participant's outcome in one event.
///
/// Created with no placement, no value and zero points when the participant
/// is registered. `points` and `is_new_record` are only ever written by
/// settlement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventResult {
    pub result_id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub tournament_id: Uuid,
    pub house_id: Uuid,
    pub placement: Option<i32>,
    pub value: Option<Decimal>,
    pub points: i32,
    pub is_new_record: bool,
    pub is_disqualified: bool,
    pub label: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: Option<chrono::NaiveDateTime>,
}
