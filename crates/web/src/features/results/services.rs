use sqlx::PgPool;
use storage::{
    dto::result::EnterResultRequest, error::Result, models::EventResult,
    repository::result::ResultRepository,
};
use uuid::Uuid;

/// Store a raw result entry; standings change on the next settlement
pub async fn enter_result(
    pool: &PgPool,
    id: Uuid,
    request: &EnterResultRequest,
) -> Result<EventResult> {
    let repo = ResultRepository::new(pool);
    repo.enter(id, request).await
}
