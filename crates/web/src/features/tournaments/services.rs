use sqlx::PgPool;
use storage::{
    dto::dashboard::LeaderboardResponse,
    dto::tournament::{CreateTournamentRequest, UpdateTournamentRequest},
    error::Result,
    models::Tournament,
    repository::dashboard::DashboardRepository,
    repository::tournament::TournamentRepository,
};
use uuid::Uuid;

/// List all tournaments
pub async fn list_tournaments(pool: &PgPool) -> Result<Vec<Tournament>> {
    let repo = TournamentRepository::new(pool);
    repo.list().await
}

pub async fn get_tournament(pool: &PgPool, id: Uuid) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn get_active_tournament(pool: &PgPool) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.get_active().await
}

pub async fn create_tournament(
    pool: &PgPool,
    request: &CreateTournamentRequest,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.create(request).await
}

pub async fn update_tournament(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateTournamentRequest,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_tournament(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = TournamentRepository::new(pool);
    repo.delete(id).await
}

pub async fn activate_tournament(pool: &PgPool, id: Uuid) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.activate(id).await
}

/// House standings, highest total first, ties broken by house name
pub async fn get_leaderboard(pool: &PgPool, tournament_id: Uuid) -> Result<LeaderboardResponse> {
    let tournament = TournamentRepository::new(pool).find_by_id(tournament_id).await?;
    let entries = DashboardRepository::new(pool)
        .leaderboard(tournament.tournament_id)
        .await?;

    Ok(LeaderboardResponse {
        tournament_id: tournament.tournament_id,
        entries,
    })
}
