use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::announcement::CreateAnnouncementRequest, models::Announcement};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::notifications::Notification;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/announcements",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Announcements, newest first", body = Vec<Announcement>),
        (status = 404, description = "Tournament not found")
    ),
    tag = "announcements"
)]
pub async fn list_tournament_announcements(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let announcements = services::list_announcements(db.pool(), id).await?;

    Ok(Json(announcements).into_response())
}

#[utoipa::path(
    post,
    path = "/api/announcements",
    request_body = CreateAnnouncementRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Announcement posted", body = Announcement),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "No active tournament")
    ),
    tag = "announcements"
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    Json(req): Json<CreateAnnouncementRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let announcement = services::create_announcement(state.db.pool(), &req).await?;
    state.changed([Notification::ReceiveAnnouncement(announcement.clone())]);

    Ok((StatusCode::CREATED, Json(announcement)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    params(
        ("id" = Uuid, Path, description = "Announcement ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Announcement not found")
    ),
    tag = "announcements"
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_announcement(state.db.pool(), id).await?;
    state.invalidate();

    Ok(StatusCode::NO_CONTENT.into_response())
}
