use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::result::{EnterResultRequest, ResultDetail};
use crate::error::{Result, StorageError};
use crate::models::{Event, EventResult, Participant};

use super::event::lock_event;

/// Repository for Result rows: registration, entry and listing
pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Results of an event, placed entries first
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<ResultDetail>> {
        let results = sqlx::query_as::<_, ResultDetail>(
            r#"
            SELECT r.result_id, r.event_id, r.participant_id, p.first_name, p.last_name,
                   r.house_id, h.name AS house_name, r.placement, r.value, r.points,
                   r.is_new_record, r.is_disqualified, r.label, r.updated_at
            FROM results r
            INNER JOIN participants p ON p.participant_id = r.participant_id
            INNER JOIN houses h ON h.house_id = r.house_id
            WHERE r.event_id = $1
            ORDER BY (r.placement IS NULL OR r.placement = 0), r.placement,
                     r.created_at, r.result_id
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(results)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<EventResult> {
        let result = sqlx::query_as::<_, EventResult>(
            r#"
            SELECT result_id, event_id, participant_id, tournament_id, house_id, placement,
                   value, points, is_new_record, is_disqualified, label, created_at, updated_at
            FROM results
            WHERE result_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(result)
    }

    /// Registers a participant for an event by creating their empty result.
    pub async fn register(&self, event_id: Uuid, participant: &Participant) -> Result<EventResult> {
        let mut tx = self.pool.begin().await?;

        let event = lock_event(&mut *tx, event_id).await?;
        ensure_open(&event)?;
        check_eligibility(&event, participant)?;

        let result = sqlx::query_as::<_, EventResult>(
            r#"
            INSERT INTO results (event_id, participant_id, tournament_id, house_id)
            VALUES ($1, $2, $3, $4)
            RETURNING result_id, event_id, participant_id, tournament_id, house_id, placement,
                      value, points, is_new_record, is_disqualified, label, created_at, updated_at
            "#,
        )
        .bind(event.event_id)
        .bind(participant.participant_id)
        .bind(event.tournament_id)
        .bind(participant.house_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            StorageError::from(e).unique_as("Participant is already registered for this event")
        })?;

        tx.commit().await?;

        Ok(result)
    }

    /// Removes a registration that has no recorded placement yet.
    pub async fn unregister(&self, event_id: Uuid, participant_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let event = lock_event(&mut *tx, event_id).await?;
        ensure_open(&event)?;

        let placement = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT placement FROM results WHERE event_id = $1 AND participant_id = $2",
        )
        .bind(event_id)
        .bind(participant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        if placement.is_some() {
            return Err(StorageError::BusinessRule(
                "Participant already has a recorded placement in this event".to_string(),
            ));
        }

        sqlx::query("DELETE FROM results WHERE event_id = $1 AND participant_id = $2")
            .bind(event_id)
            .bind(participant_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Stores a raw entry. Points and the record flag are left for settlement.
    pub async fn enter(&self, result_id: Uuid, req: &EnterResultRequest) -> Result<EventResult> {
        let existing = self.find_by_id(result_id).await?;

        let mut tx = self.pool.begin().await?;

        let event = lock_event(&mut *tx, existing.event_id).await?;
        ensure_open(&event)?;

        let result = sqlx::query_as::<_, EventResult>(
            r#"
            UPDATE results
            SET placement = $2, value = $3, label = $4, is_disqualified = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE result_id = $1
            RETURNING result_id, event_id, participant_id, tournament_id, house_id, placement,
                      value, points, is_new_record, is_disqualified, label, created_at, updated_at
            "#,
        )
        .bind(result_id)
        .bind(req.placement)
        .bind(req.value)
        .bind(req.label.as_deref().map(str::trim))
        .bind(req.is_disqualified)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        tx.commit().await?;

        Ok(result)
    }
}

/// Result rows of an event in registration order, locked for the rest of
/// the transaction.
pub(crate) async fn lock_event_results(
    conn: &mut PgConnection,
    event_id: Uuid,
) -> Result<Vec<EventResult>> {
    let results = sqlx::query_as::<_, EventResult>(
        r#"
        SELECT result_id, event_id, participant_id, tournament_id, house_id, placement,
               value, points, is_new_record, is_disqualified, label, created_at, updated_at
        FROM results
        WHERE event_id = $1
        ORDER BY created_at, result_id
        FOR UPDATE
        "#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(results)
}

fn ensure_open(event: &Event) -> Result<()> {
    if event.status()?.accepts_results() {
        Ok(())
    } else {
        Err(StorageError::BusinessRule(format!(
            "Event '{}' is {}; its results can no longer be changed",
            event.name, event.status
        )))
    }
}

/// A participant may enter an event only from its tournament and, when the
/// event is restricted, only from the matching division and age class.
pub fn check_eligibility(event: &Event, participant: &Participant) -> Result<()> {
    if event.tournament_id != participant.tournament_id {
        return Err(StorageError::BusinessRule(
            "Participant belongs to a different tournament".to_string(),
        ));
    }

    if let Some(division) = &event.gender_division
        && !division.eq_ignore_ascii_case(&participant.gender_division)
    {
        return Err(StorageError::BusinessRule(format!(
            "Event is restricted to the {division} division"
        )));
    }

    if let Some(age_class) = &event.age_class
        && !age_class.eq_ignore_ascii_case(&participant.age_class)
    {
        return Err(StorageError::BusinessRule(format!(
            "Event is restricted to the {age_class} age class"
        )));
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

    fn event(tournament_id: Uuid, division: Option<&str>, age_class: Option<&str>) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            tournament_id,
            name: "200m".to_string(),
            event_type: "speed".to_string(),
            point_table: "5,3,1".to_string(),
            record_value: None,
            record_holder_id: None,
            status: "scheduled".to_string(),
            is_published: false,
            gender_division: division.map(String::from),
            age_class: age_class.map(String::from),
            scheduled_at: None,
            created_at: timestamp(),
        }
    }

    fn participant(tournament_id: Uuid, division: &str, age_class: &str) -> Participant {
        Participant {
            participant_id: Uuid::new_v4(),
            tournament_id,
            house_id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            gender_division: division.to_string(),
            age_class: age_class.to_string(),
            created_at: timestamp(),
        }
    }

    #[test]
    fn test_open_event_accepts_anyone_from_tournament() {
        let t = Uuid::new_v4();
        assert!(check_eligibility(&event(t, None, None), &participant(t, "M", "U14")).is_ok());
    }

    #[test]
    fn test_division_and_age_class_enforced() {
        let t = Uuid::new_v4();
        let girls_u12 = event(t, Some("F"), Some("U12"));

        assert!(check_eligibility(&girls_u12, &participant(t, "f", "u12")).is_ok());
        assert!(matches!(
            check_eligibility(&girls_u12, &participant(t, "M", "U12")),
            Err(StorageError::BusinessRule(_))
        ));
        assert!(matches!(
            check_eligibility(&girls_u12, &participant(t, "F", "U14")),
            Err(StorageError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_other_tournament_rejected() {
        let e = event(Uuid::new_v4(), None, None);
        assert!(check_eligibility(&e, &participant(Uuid::new_v4(), "F", "U12")).is_err());
    }

    #[test]
    fn test_closed_events_reject_changes() {
        let mut e = event(Uuid::new_v4(), None, None);
        assert!(ensure_open(&e).is_ok());

        e.status = "in_progress".to_string();
        assert!(ensure_open(&e).is_ok());

        e.status = "completed".to_string();
        assert!(ensure_open(&e).is_err());

        e.status = "cancelled".to_string();
        assert!(ensure_open(&e).is_err());
    }
}
