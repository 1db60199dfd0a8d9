use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Announcement;

pub struct AnnouncementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnnouncementRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, at most `limit`
    pub async fn list_recent(&self, tournament_id: Uuid, limit: i64) -> Result<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT announcement_id, tournament_id, title, body, created_at
            FROM announcements
            WHERE tournament_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tournament_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(announcements)
    }

    pub async fn create(&self, tournament_id: Uuid, title: &str, body: &str) -> Result<Announcement> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (tournament_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING announcement_id, tournament_id, title, body, created_at
            "#,
        )
        .bind(tournament_id)
        .bind(title)
        .bind(body)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).foreign_key_as("Tournament not found"))?;

        Ok(announcement)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM announcements WHERE announcement_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
