use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::tournament::{CreateTournamentRequest, UpdateTournamentRequest};
use crate::error::{Result, StorageError};
use crate::models::Tournament;

/// Repository for Tournament database operations
pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tournaments, most recent first
    pub async fn list(&self) -> Result<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, venue, event_date, is_active, created_at
            FROM tournaments
            ORDER BY event_date DESC, created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, venue, event_date, is_active, created_at
            FROM tournaments
            WHERE tournament_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tournaments WHERE tournament_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// The tournament currently flagged active, if any
    pub async fn find_active(&self) -> Result<Option<Tournament>> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, venue, event_date, is_active, created_at
            FROM tournaments
            WHERE is_active
            "#,
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(tournament)
    }

    pub async fn get_active(&self) -> Result<Tournament> {
        self.find_active()
            .await?
            .ok_or(StorageError::NoActiveTournament)
    }

    /// Returns `id` when given (after checking it exists), otherwise the
    /// active tournament's id.
    pub async fn resolve(&self, id: Option<Uuid>) -> Result<Uuid> {
        match id {
            Some(id) if self.exists(id).await? => Ok(id),
            Some(_) => Err(StorageError::NotFound),
            None => Ok(self.get_active().await?.tournament_id),
        }
    }

    pub async fn create(&self, req: &CreateTournamentRequest) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments (name, venue, event_date)
            VALUES ($1, $2, $3)
            RETURNING tournament_id, name, venue, event_date, is_active, created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.venue)
        .bind(req.event_date)
        .fetch_one(self.pool)
        .await?;

        Ok(tournament)
    }

    pub async fn update(
        &self,
        existing: &Tournament,
        req: &UpdateTournamentRequest,
    ) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET name = $2, venue = $3, event_date = $4
            WHERE tournament_id = $1
            RETURNING tournament_id, name, venue, event_date, is_active, created_at
            "#,
        )
        .bind(existing.tournament_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.venue.as_ref().or(existing.venue.as_ref()))
        .bind(req.event_date.unwrap_or(existing.event_date))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    /// Delete a tournament along with its events, participants and results
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE tournament_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Makes `id` the only active tournament.
    ///
    /// The previous active tournament is switched off in the same
    /// transaction; the partial unique index rejects a concurrent activation.
    pub async fn activate(&self, id: Uuid) -> Result<Tournament> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE tournaments SET is_active = FALSE WHERE is_active AND tournament_id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET is_active = TRUE
            WHERE tournament_id = $1
            RETURNING tournament_id, name, venue, event_date, is_active, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            StorageError::from(e)
                .unique_as("Another tournament was activated concurrently")
                .concurrent_as_conflict()
        })?
        .ok_or(StorageError::NotFound)?;

        tx.commit().await?;

        Ok(tournament)
    }
}
