use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::event::{RecordInfo, SettlementResponse};
use crate::error::{Result, StorageError};
use crate::models::{Event, EventStatus};
use crate::repository::event::{insert_update, lock_event, update_status};
use crate::repository::result::lock_event_results;
use crate::services::scoring::{self, CurrentRecord, ResultEntry, Settlement};

/// What a settlement pass did to one event
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// Event row after the pass
    pub event: Event,
    pub previous_status: EventStatus,
    pub settlement: Settlement,
}

impl SettlementOutcome {
    pub fn status_changed(&self) -> bool {
        self.event.status != self.previous_status.as_str()
    }

    pub fn to_response(&self) -> Result<SettlementResponse> {
        Ok(SettlementResponse {
            event_id: self.event.event_id,
            event_name: self.event.name.clone(),
            status: self.event.status()?,
            results_settled: self.settlement.results.len(),
            placed: self.settlement.placed_count(),
            new_record: self.settlement.new_record.map(|nr| RecordInfo {
                value: nr.value,
                holder_id: nr.holder_id,
                result_id: nr.result_id,
            }),
        })
    }
}

/// Recomputes placements, points and the record for one event.
///
/// Runs in a single transaction holding the event's row lock, so two
/// settlements of the same event never interleave. A scheduled event with
/// results moves to in progress. An event without results is left alone.
pub async fn settle_event(pool: &PgPool, event_id: Uuid) -> Result<SettlementOutcome> {
    let mut tx = pool.begin().await?;

    let outcome = settle_in(&mut *tx, event_id, false)
        .await
        .map_err(StorageError::concurrent_as_conflict)?;

    tx.commit().await?;

    log_outcome(&outcome);
    Ok(outcome)
}

/// Settles an event one last time, then completes and publishes it.
/// Completed events are frozen.
pub async fn finalize_event(pool: &PgPool, event_id: Uuid) -> Result<SettlementOutcome> {
    let mut tx = pool.begin().await?;

    let outcome = settle_in(&mut *tx, event_id, true)
        .await
        .map_err(StorageError::concurrent_as_conflict)?;

    tx.commit().await?;

    log_outcome(&outcome);
    Ok(outcome)
}

async fn settle_in(conn: &mut PgConnection, event_id: Uuid, finalize: bool) -> Result<SettlementOutcome> {
    let event = lock_event(&mut *conn, event_id).await?;
    let previous_status = event.status()?;

    if !previous_status.accepts_results() {
        return Err(StorageError::BusinessRule(format!(
            "Event '{}' is {}; its results are frozen",
            event.name, previous_status
        )));
    }

    // configuration errors surface before anything is written
    let kind = event.kind()?;
    let table = event.point_table()?;
    let record = event.record_value.map(|value| CurrentRecord {
        value,
        holder_id: event.record_holder_id,
    });

    let rows = lock_event_results(&mut *conn, event_id).await?;
    let entries: Vec<ResultEntry> = rows.iter().map(ResultEntry::from).collect();
    let settlement = scoring::settle(kind, &table, record.as_ref(), &entries);

    for settled in &settlement.results {
        sqlx::query(
            r#"
            UPDATE results
            SET placement = $2, value = $3, points = $4, is_new_record = $5,
                is_disqualified = $6, label = $7
            WHERE result_id = $1
            "#,
        )
        .bind(settled.result_id)
        .bind(settled.placement)
        .bind(settled.value)
        .bind(settled.points)
        .bind(settled.is_new_record)
        .bind(settled.is_disqualified)
        .bind(&settled.label)
        .execute(&mut *conn)
        .await?;
    }

    if let Some(new_record) = settlement.new_record {
        sqlx::query("UPDATE events SET record_value = $2, record_holder_id = $3 WHERE event_id = $1")
            .bind(event_id)
            .bind(new_record.value)
            .bind(new_record.holder_id)
            .execute(&mut *conn)
            .await?;
    }

    let mut status = previous_status;
    if status == EventStatus::Scheduled && !settlement.results.is_empty() {
        status = status.transition_to(EventStatus::InProgress)?;
        update_status(&mut *conn, event_id, status, false).await?;
    }

    if !settlement.results.is_empty() {
        insert_update(&mut *conn, event_id, &summary(&event, &settlement)).await?;
    }

    if finalize {
        for step in completion_steps(status)? {
            update_status(&mut *conn, event_id, step, step == EventStatus::Completed).await?;
        }
        insert_update(&mut *conn, event_id, "Results finalized and published").await?;
    }

    let event = lock_event(&mut *conn, event_id).await?;

    Ok(SettlementOutcome {
        event,
        previous_status,
        settlement,
    })
}

/// Statuses a finalized event moves through. An event that never started
/// (no results were settled) passes through in progress on its way to
/// completed.
fn completion_steps(from: EventStatus) -> Result<Vec<EventStatus>> {
    let mut steps = Vec::with_capacity(2);
    let mut status = from;

    if status == EventStatus::Scheduled {
        status = status.transition_to(EventStatus::InProgress)?;
        steps.push(status);
    }
    steps.push(status.transition_to(EventStatus::Completed)?);

    Ok(steps)
}

fn summary(event: &Event, settlement: &Settlement) -> String {
    match settlement.new_record {
        Some(nr) => format!(
            "{}: {} results settled, new record {}",
            event.name,
            settlement.placed_count(),
            nr.value
        ),
        None => format!("{}: {} results settled", event.name, settlement.placed_count()),
    }
}

fn log_outcome(outcome: &SettlementOutcome) {
    tracing::info!(
        event_id = %outcome.event.event_id,
        results = outcome.settlement.results.len(),
        placed = outcome.settlement.placed_count(),
        new_record = ?outcome.settlement.new_record.map(|nr| nr.value),
        status = %outcome.event.status,
        "Event settled"
    );
}
