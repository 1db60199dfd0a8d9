use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::house::{CreateHouseRequest, UpdateHouseRequest};
use crate::error::{Result, StorageError};
use crate::models::House;

pub struct HouseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HouseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<House>> {
        let houses = sqlx::query_as::<_, House>(
            "SELECT house_id, name, color, created_at FROM houses ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(houses)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<House> {
        let house = sqlx::query_as::<_, House>(
            "SELECT house_id, name, color, created_at FROM houses WHERE house_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(house)
    }

    pub async fn create(&self, req: &CreateHouseRequest) -> Result<House> {
        let house = sqlx::query_as::<_, House>(
            r#"
            INSERT INTO houses (name, color)
            VALUES ($1, $2)
            RETURNING house_id, name, color, created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.color)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).unique_as("House name already exists"))?;

        Ok(house)
    }

    pub async fn update(&self, existing: &House, req: &UpdateHouseRequest) -> Result<House> {
        let house = sqlx::query_as::<_, House>(
            r#"
            UPDATE houses
            SET name = $2, color = $3
            WHERE house_id = $1
            RETURNING house_id, name, color, created_at
            "#,
        )
        .bind(existing.house_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.color.as_ref().or(existing.color.as_ref()))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).unique_as("House name already exists"))?
        .ok_or(StorageError::NotFound)?;

        Ok(house)
    }

    /// Houses with participants or results cannot be deleted
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM houses WHERE house_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e).foreign_key_as("House still has participants or results")
            })?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
