use sqlx::PgPool;
use storage::{
    dto::announcement::CreateAnnouncementRequest,
    error::{Result, StorageError},
    models::Announcement,
    repository::announcement::AnnouncementRepository,
    repository::tournament::TournamentRepository,
};
use uuid::Uuid;

const LIST_LIMIT: i64 = 50;

/// Newest announcements of a tournament
pub async fn list_announcements(pool: &PgPool, tournament_id: Uuid) -> Result<Vec<Announcement>> {
    if !TournamentRepository::new(pool).exists(tournament_id).await? {
        return Err(StorageError::NotFound);
    }

    let repo = AnnouncementRepository::new(pool);
    repo.list_recent(tournament_id, LIST_LIMIT).await
}

/// Post to the given or the active tournament
pub async fn create_announcement(
    pool: &PgPool,
    request: &CreateAnnouncementRequest,
) -> Result<Announcement> {
    let tournament_id = TournamentRepository::new(pool)
        .resolve(request.tournament_id)
        .await?;

    let repo = AnnouncementRepository::new(pool);
    repo.create(tournament_id, request.title.trim(), request.body.trim())
        .await
}

pub async fn delete_announcement(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = AnnouncementRepository::new(pool);
    repo.delete(id).await
}
