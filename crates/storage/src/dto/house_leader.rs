use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimHouseRequest {
    pub house_id: Uuid,
}

/// A claimed house, without the claiming key
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HouseLeaderResponse {
    pub house_id: Uuid,
    pub house_name: String,
    pub claimed_at: chrono::NaiveDateTime,
}
