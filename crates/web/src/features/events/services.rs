use sqlx::PgPool;
use storage::{
    dto::event::{CreateEventRequest, EventResponse, UpdateEventRequest},
    dto::result::EventResultsResponse,
    error::{Result, StorageError},
    models::{Event, EventResult, EventStatus, EventUpdate, Participant},
    repository::event::EventRepository,
    repository::result::ResultRepository,
    repository::tournament::TournamentRepository,
    services::settlement::{self, SettlementOutcome},
};
use uuid::Uuid;

/// Events of one tournament in schedule order
pub async fn list_events(pool: &PgPool, tournament_id: Uuid) -> Result<Vec<Event>> {
    if !TournamentRepository::new(pool).exists(tournament_id).await? {
        return Err(StorageError::NotFound);
    }

    let repo = EventRepository::new(pool);
    repo.list_by_tournament(tournament_id).await
}

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn get_event_results(pool: &PgPool, id: Uuid) -> Result<EventResultsResponse> {
    let event = EventRepository::new(pool).find_by_id(id).await?;
    let results = ResultRepository::new(pool).list_for_event(id).await?;

    Ok(EventResultsResponse {
        event: EventResponse::try_from(event)?,
        results,
    })
}

/// Create an event in the given or the active tournament
pub async fn create_event(pool: &PgPool, request: &CreateEventRequest) -> Result<Event> {
    let tournament_id = TournamentRepository::new(pool)
        .resolve(request.tournament_id)
        .await?;

    let repo = EventRepository::new(pool);
    repo.create(tournament_id, request).await
}

pub async fn update_event(pool: &PgPool, id: Uuid, request: &UpdateEventRequest) -> Result<Event> {
    let repo = EventRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = EventRepository::new(pool);
    repo.delete(id).await
}

/// Result of a status change request
pub enum StatusChange {
    Moved { event: Event, previous: EventStatus },
    Finalized(SettlementOutcome),
}

/// Completing an event always goes through finalization so the final
/// standings are settled before the event freezes.
pub async fn change_status(pool: &PgPool, id: Uuid, next: EventStatus) -> Result<StatusChange> {
    if next == EventStatus::Completed {
        return Ok(StatusChange::Finalized(settlement::finalize_event(pool, id).await?));
    }

    let repo = EventRepository::new(pool);
    let previous = repo.find_by_id(id).await?.status()?;
    let event = repo.set_status(id, next).await?;

    Ok(StatusChange::Moved { event, previous })
}

pub async fn settle_event(pool: &PgPool, id: Uuid) -> Result<SettlementOutcome> {
    settlement::settle_event(pool, id).await
}

pub async fn finalize_event(pool: &PgPool, id: Uuid) -> Result<SettlementOutcome> {
    settlement::finalize_event(pool, id).await
}

pub async fn add_event_update(pool: &PgPool, id: Uuid, message: &str) -> Result<EventUpdate> {
    let repo = EventRepository::new(pool);
    repo.add_update(id, message.trim()).await
}

pub async fn list_event_updates(pool: &PgPool, id: Uuid) -> Result<Vec<EventUpdate>> {
    let repo = EventRepository::new(pool);
    if !repo.exists(id).await? {
        return Err(StorageError::NotFound);
    }

    repo.list_updates(id).await
}

/// Register a participant by creating their empty result for the event
pub async fn register_participant(
    pool: &PgPool,
    event_id: Uuid,
    participant: &Participant,
) -> Result<EventResult> {
    let repo = ResultRepository::new(pool);
    repo.register(event_id, participant).await
}

pub async fn unregister_participant(
    pool: &PgPool,
    event_id: Uuid,
    participant_id: Uuid,
) -> Result<()> {
    let repo = ResultRepository::new(pool);
    repo.unregister(event_id, participant_id).await
}
