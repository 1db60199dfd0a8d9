use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::house_leader::HouseLeaderResponse;
use crate::error::{Result, StorageError};
use crate::models::HouseLeader;

const ONE_HOUSE_PER_KEY: &str = "house_leaders_one_house_per_key";
const ONE_LEADER_PER_HOUSE: &str = "house_leaders_one_leader_per_house";

/// Claims binding house-leader keys to houses
pub struct HouseLeaderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HouseLeaderRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<HouseLeaderResponse>> {
        let claims = sqlx::query_as::<_, HouseLeaderResponse>(
            r#"
            SELECT hl.house_id, h.name AS house_name, hl.claimed_at
            FROM house_leaders hl
            INNER JOIN houses h ON h.house_id = hl.house_id
            ORDER BY h.name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(claims)
    }

    pub async fn find_by_key(&self, api_key: &str) -> Result<Option<HouseLeader>> {
        let claim = sqlx::query_as::<_, HouseLeader>(
            "SELECT api_key, house_id, claimed_at FROM house_leaders WHERE api_key = $1",
        )
        .bind(api_key)
        .fetch_optional(self.pool)
        .await?;

        Ok(claim)
    }

    /// Binds a key to a house. A house that already has a leader, or a key
    /// that already leads a house, is rejected.
    pub async fn claim(&self, api_key: &str, house_id: Uuid) -> Result<HouseLeader> {
        let claim = sqlx::query_as::<_, HouseLeader>(
            r#"
            INSERT INTO house_leaders (api_key, house_id)
            VALUES ($1, $2)
            RETURNING api_key, house_id, claimed_at
            "#,
        )
        .bind(api_key)
        .bind(house_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| claim_error(StorageError::from(e)))?;

        tracing::info!(%house_id, "House claimed by a house leader");

        Ok(claim)
    }

    /// Frees a house so another leader can claim it.
    pub async fn release(&self, house_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM house_leaders WHERE house_id = $1")
            .bind(house_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn claim_error(error: StorageError) -> StorageError {
    if error.violates(ONE_LEADER_PER_HOUSE) {
        StorageError::BusinessRule("House already has a leader".to_string())
    } else if error.violates(ONE_HOUSE_PER_KEY) {
        StorageError::BusinessRule("This key already leads a house".to_string())
    } else if error.is_foreign_key_violation() {
        StorageError::NotFound
    } else {
        error
    }
}
