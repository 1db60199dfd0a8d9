use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::participant::{CreateParticipantRequest, UpdateParticipantRequest};
use crate::error::{Result, StorageError};
use crate::models::{Event, EventStatus, Participant};

use super::result::check_eligibility;

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of a tournament's participants plus the total count
    pub async fn list_by_tournament(
        &self,
        tournament_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Participant>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_one(self.pool)
        .await?;

        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT participant_id, tournament_id, house_id, first_name, last_name,
                   gender_division, age_class, created_at
            FROM participants
            WHERE tournament_id = $1
            ORDER BY last_name, first_name, participant_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tournament_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((participants, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            SELECT participant_id, tournament_id, house_id, first_name, last_name,
                   gender_division, age_class, created_at
            FROM participants
            WHERE participant_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(participant)
    }

    pub async fn create(
        &self,
        tournament_id: Uuid,
        req: &CreateParticipantRequest,
    ) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (
                tournament_id, house_id, first_name, last_name, gender_division, age_class
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING participant_id, tournament_id, house_id, first_name, last_name,
                      gender_division, age_class, created_at
            "#,
        )
        .bind(tournament_id)
        .bind(req.house_id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.gender_division)
        .bind(&req.age_class)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).foreign_key_as("House or tournament not found"))?;

        Ok(participant)
    }

    /// Updates a participant. A house change is carried over to the
    /// participant's result rows so house totals follow them.
    ///
    /// Rejected when the change would move finalized points to another house
    /// or leave an open registration the participant no longer qualifies for.
    pub async fn update(
        &self,
        existing: &Participant,
        req: &UpdateParticipantRequest,
    ) -> Result<Participant> {
        let mut tx = self.pool.begin().await?;

        let participant = sqlx::query_as::<_, Participant>(
            r#"
            UPDATE participants
            SET house_id = $2, first_name = $3, last_name = $4, gender_division = $5,
                age_class = $6
            WHERE participant_id = $1
            RETURNING participant_id, tournament_id, house_id, first_name, last_name,
                      gender_division, age_class, created_at
            "#,
        )
        .bind(existing.participant_id)
        .bind(req.house_id.unwrap_or(existing.house_id))
        .bind(req.first_name.as_ref().unwrap_or(&existing.first_name))
        .bind(req.last_name.as_ref().unwrap_or(&existing.last_name))
        .bind(req.gender_division.as_ref().unwrap_or(&existing.gender_division))
        .bind(req.age_class.as_ref().unwrap_or(&existing.age_class))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).foreign_key_as("House not found"))?
        .ok_or(StorageError::NotFound)?;

        let events = registered_events(&mut *tx, participant.participant_id).await?;
        check_registrations(existing, &participant, &events)?;

        if participant.house_id != existing.house_id {
            sqlx::query("UPDATE results SET house_id = $2 WHERE participant_id = $1")
                .bind(participant.participant_id)
                .bind(participant.house_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(participant)
    }

    /// Removes a participant and their unscored registrations.
    ///
    /// Rejected when any of their results carries a placement or belongs to
    /// a finalized event.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let blocking = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM results r
            INNER JOIN events e ON e.event_id = r.event_id
            WHERE r.participant_id = $1
              AND (r.placement IS NOT NULL OR e.status = 'completed')
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if blocking > 0 {
            return Err(StorageError::BusinessRule(
                "Participant already has recorded results and cannot be removed".to_string(),
            ));
        }

        sqlx::query("DELETE FROM results WHERE participant_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM participants WHERE participant_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Events the participant is registered for, share-locked so their status
/// cannot change until the transaction ends.
async fn registered_events(conn: &mut PgConnection, participant_id: Uuid) -> Result<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT e.event_id, e.tournament_id, e.name, e.event_type, e.point_table,
               e.record_value, e.record_holder_id, e.status, e.is_published,
               e.gender_division, e.age_class, e.scheduled_at, e.created_at
        FROM events e
        INNER JOIN results r ON r.event_id = e.event_id
        WHERE r.participant_id = $1
        ORDER BY e.created_at, e.event_id
        FOR SHARE OF e
        "#,
    )
    .bind(participant_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| StorageError::from(e).concurrent_as_conflict())?;

    Ok(events)
}

/// Checks an edited participant against the events they are registered for.
///
/// Finalized events pin the participant's house. Open events must still
/// admit the participant's division and age class.
pub fn check_registrations(
    before: &Participant,
    after: &Participant,
    events: &[Event],
) -> Result<()> {
    if before.house_id != after.house_id
        && let Some(event) = events
            .iter()
            .find(|event| event.status == EventStatus::Completed.as_str())
    {
        return Err(StorageError::BusinessRule(format!(
            "Participant has finalized results in '{}'; their house can no longer change",
            event.name
        )));
    }

    let eligibility_changed = !before
        .gender_division
        .eq_ignore_ascii_case(&after.gender_division)
        || !before.age_class.eq_ignore_ascii_case(&after.age_class);

    if eligibility_changed {
        for event in events {
            if event.status()?.accepts_results() {
                check_eligibility(event, after).map_err(|_| {
                    StorageError::BusinessRule(format!(
                        "Participant would no longer qualify for '{}'; unregister them first",
                        event.name
                    ))
                })?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn timestamp() -> NaiveDateTime {
        chrono::DateTime::from_timestamp(1_750_000_000, 0)
            .unwrap()
            .naive_utc()
    }

    fn event(tournament_id: Uuid, status: EventStatus, division: Option<&str>) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            tournament_id,
            name: "Long jump".to_string(),
            event_type: "distance".to_string(),
            point_table: "5,3,1".to_string(),
            record_value: None,
            record_holder_id: None,
            status: status.as_str().to_string(),
            is_published: status == EventStatus::Completed,
            gender_division: division.map(String::from),
            age_class: None,
            scheduled_at: None,
            created_at: timestamp(),
        }
    }

    fn participant(tournament_id: Uuid) -> Participant {
        Participant {
            participant_id: Uuid::new_v4(),
            tournament_id,
            house_id: Uuid::new_v4(),
            first_name: "Tomas".to_string(),
            last_name: "Reyes".to_string(),
            gender_division: "M".to_string(),
            age_class: "U14".to_string(),
            created_at: timestamp(),
        }
    }

    #[test]
    fn test_house_pinned_by_finalized_event() {
        let t = Uuid::new_v4();
        let before = participant(t);
        let mut after = before.clone();
        after.house_id = Uuid::new_v4();

        let events = [
            event(t, EventStatus::InProgress, None),
            event(t, EventStatus::Completed, None),
        ];

        assert!(matches!(
            check_registrations(&before, &after, &events),
            Err(StorageError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_house_moves_while_events_are_open() {
        let t = Uuid::new_v4();
        let before = participant(t);
        let mut after = before.clone();
        after.house_id = Uuid::new_v4();

        let events = [
            event(t, EventStatus::Scheduled, None),
            event(t, EventStatus::Cancelled, None),
        ];

        assert!(check_registrations(&before, &after, &events).is_ok());
    }

    #[test]
    fn test_rename_ignores_finalized_events() {
        let t = Uuid::new_v4();
        let before = participant(t);
        let mut after = before.clone();
        after.first_name = "Tom".to_string();

        let events = [event(t, EventStatus::Completed, Some("F"))];

        assert!(check_registrations(&before, &after, &events).is_ok());
    }

    #[test]
    fn test_division_change_must_fit_open_registrations() {
        let t = Uuid::new_v4();
        let before = participant(t);
        let mut after = before.clone();
        after.gender_division = "F".to_string();

        let boys = [event(t, EventStatus::Scheduled, Some("M"))];
        assert!(matches!(
            check_registrations(&before, &after, &boys),
            Err(StorageError::BusinessRule(_))
        ));

        let finished_boys = [event(t, EventStatus::Completed, Some("M"))];
        assert!(check_registrations(&before, &after, &finished_boys).is_ok());

        let girls = [event(t, EventStatus::InProgress, Some("F"))];
        assert!(check_registrations(&before, &after, &girls).is_ok());
    }
}
