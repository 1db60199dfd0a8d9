use sqlx::PgPool;
use storage::{
    dto::common::PaginationParams,
    dto::participant::{CreateParticipantRequest, UpdateParticipantRequest},
    error::{Result, StorageError},
    models::Participant,
    repository::participant::ParticipantRepository,
    repository::tournament::TournamentRepository,
};
use uuid::Uuid;

/// One page of a tournament's participants and the total count
pub async fn list_participants(
    pool: &PgPool,
    tournament_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<Participant>, i64)> {
    if !TournamentRepository::new(pool).exists(tournament_id).await? {
        return Err(StorageError::NotFound);
    }

    let repo = ParticipantRepository::new(pool);
    repo.list_by_tournament(tournament_id, pagination).await
}

pub async fn get_participant(pool: &PgPool, id: Uuid) -> Result<Participant> {
    let repo = ParticipantRepository::new(pool);
    repo.find_by_id(id).await
}

/// Enrol a participant in the given or the active tournament
pub async fn create_participant(
    pool: &PgPool,
    request: &CreateParticipantRequest,
) -> Result<Participant> {
    let tournament_id = TournamentRepository::new(pool)
        .resolve(request.tournament_id)
        .await?;

    let repo = ParticipantRepository::new(pool);
    repo.create(tournament_id, request).await
}

pub async fn update_participant(
    pool: &PgPool,
    existing: &Participant,
    request: &UpdateParticipantRequest,
) -> Result<Participant> {
    let repo = ParticipantRepository::new(pool);
    repo.update(existing, request).await
}

pub async fn delete_participant(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = ParticipantRepository::new(pool);
    repo.delete(id).await
}
