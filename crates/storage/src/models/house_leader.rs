use sqlx::FromRow;
use uuid::Uuid;

/// A house-leader key bound to the house it manages. Not serialized; the key
/// never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct HouseLeader {
    pub api_key: String,
    pub house_id: Uuid,
    pub claimed_at: chrono::NaiveDateTime,
}
