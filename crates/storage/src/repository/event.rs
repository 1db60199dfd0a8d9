use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::event::{CreateEventRequest, UpdateEventRequest};
use crate::error::{Result, StorageError};
use crate::models::{Event, EventStatus, EventUpdate};

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_tournament(&self, tournament_id: Uuid) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, tournament_id, name, event_type, point_table, record_value,
                   record_holder_id, status, is_published, gender_division, age_class,
                   scheduled_at, created_at
            FROM events
            WHERE tournament_id = $1
            ORDER BY scheduled_at NULLS LAST, name
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, tournament_id, name, event_type, point_table, record_value,
                   record_holder_id, status, is_published, gender_division, age_class,
                   scheduled_at, created_at
            FROM events
            WHERE event_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE event_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn create(&self, tournament_id: Uuid, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                tournament_id, name, event_type, point_table, gender_division,
                age_class, scheduled_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING event_id, tournament_id, name, event_type, point_table, record_value,
                      record_holder_id, status, is_published, gender_division, age_class,
                      scheduled_at, created_at
            "#,
        )
        .bind(tournament_id)
        .bind(&req.name)
        .bind(req.event_type.as_str())
        .bind(req.point_table.trim())
        .bind(&req.gender_division)
        .bind(&req.age_class)
        .bind(req.scheduled_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).foreign_key_as("Tournament not found"))?;

        Ok(event)
    }

    /// Updates the descriptive fields of an event. A changed point table
    /// applies from the next settlement.
    pub async fn update(&self, existing: &Event, req: &UpdateEventRequest) -> Result<Event> {
        if !existing.status()?.accepts_results() {
            return Err(StorageError::BusinessRule(format!(
                "Event '{}' is {} and can no longer be edited",
                existing.name, existing.status
            )));
        }

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = $2, point_table = $3, gender_division = $4, age_class = $5,
                scheduled_at = $6
            WHERE event_id = $1
            RETURNING event_id, tournament_id, name, event_type, point_table, record_value,
                      record_holder_id, status, is_published, gender_division, age_class,
                      scheduled_at, created_at
            "#,
        )
        .bind(existing.event_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(
            req.point_table
                .as_deref()
                .map(str::trim)
                .unwrap_or(&existing.point_table),
        )
        .bind(req.gender_division.as_ref().or(existing.gender_division.as_ref()))
        .bind(req.age_class.as_ref().or(existing.age_class.as_ref()))
        .bind(req.scheduled_at.or(existing.scheduled_at))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Deletes an event and its results. Completed events are frozen.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let event = lock_event(&mut *tx, id).await?;
        if event.status()? == EventStatus::Completed {
            return Err(StorageError::BusinessRule(format!(
                "Event '{}' has been finalized and cannot be deleted",
                event.name
            )));
        }

        sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Moves an event along its status machine, rejecting illegal transitions.
    pub async fn set_status(&self, id: Uuid, next: EventStatus) -> Result<Event> {
        let mut tx = self.pool.begin().await?;

        let event = lock_event(&mut *tx, id).await?;
        let current = event.status()?;
        current.transition_to(next)?;

        let event = update_status(&mut *tx, id, next, next == EventStatus::Completed).await?;
        insert_update(
            &mut *tx,
            id,
            &format!("Status changed from {current} to {next}"),
        )
        .await?;

        tx.commit().await?;

        Ok(event)
    }

    pub async fn add_update(&self, event_id: Uuid, message: &str) -> Result<EventUpdate> {
        let mut conn = self.pool.acquire().await?;
        insert_update(&mut *conn, event_id, message)
            .await
            .map_err(|e| e.foreign_key_as("Event not found"))
    }

    pub async fn list_updates(&self, event_id: Uuid) -> Result<Vec<EventUpdate>> {
        let updates = sqlx::query_as::<_, EventUpdate>(
            r#"
            SELECT event_update_id, event_id, message, created_at
            FROM event_updates
            WHERE event_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(updates)
    }
}

/// Loads an event and holds its row lock until the transaction ends.
pub(crate) async fn lock_event(conn: &mut PgConnection, id: Uuid) -> Result<Event> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        SELECT event_id, tournament_id, name, event_type, point_table, record_value,
               record_holder_id, status, is_published, gender_division, age_class,
               scheduled_at, created_at
        FROM events
        WHERE event_id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| StorageError::from(e).concurrent_as_conflict())?
    .ok_or(StorageError::NotFound)?;

    Ok(event)
}

pub(crate) async fn update_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: EventStatus,
    publish: bool,
) -> Result<Event> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET status = $2, is_published = is_published OR $3
        WHERE event_id = $1
        RETURNING event_id, tournament_id, name, event_type, point_table, record_value,
                  record_holder_id, status, is_published, gender_division, age_class,
                  scheduled_at, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(publish)
    .fetch_one(&mut *conn)
    .await?;

    Ok(event)
}

pub(crate) async fn insert_update(
    conn: &mut PgConnection,
    event_id: Uuid,
    message: &str,
) -> Result<EventUpdate> {
    let update = sqlx::query_as::<_, EventUpdate>(
        r#"
        INSERT INTO event_updates (event_id, message)
        VALUES ($1, $2)
        RETURNING event_update_id, event_id, message, created_at
        "#,
    )
    .bind(event_id)
    .bind(message)
    .fetch_one(&mut *conn)
    .await?;

    Ok(update)
}
