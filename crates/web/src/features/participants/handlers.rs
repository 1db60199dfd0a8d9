use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::{PaginatedResponse, PaginationParams},
    dto::participant::{CreateParticipantRequest, ParticipantResponse, UpdateParticipantRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::house_leaders::services::scope_of;
use crate::middleware::auth::Caller;
use crate::notifications::Notification;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/participants",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "One page of participants, ordered by name", body = PaginatedResponse<ParticipantResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "participants"
)]
pub async fn list_tournament_participants(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (participants, total_items) =
        services::list_participants(db.pool(), id, &pagination).await?;

    let data: Vec<ParticipantResponse> = participants
        .into_iter()
        .map(ParticipantResponse::from)
        .collect();

    let response = PaginatedResponse::new(
        data,
        pagination.page,
        pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participants/{id}",
    params(
        ("id" = Uuid, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Participant found", body = ParticipantResponse),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let participant = services::get_participant(db.pool(), id).await?;

    Ok(Json(ParticipantResponse::from(participant)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = CreateParticipantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Participant created successfully", body = ParticipantResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "House leaders may only enrol into their own house"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Unknown house or no active tournament")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    scope_of(state.db.pool(), &caller)
        .await?
        .check(req.house_id)?;

    let participant = services::create_participant(state.db.pool(), &req).await?;
    state.invalidate();

    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse::from(participant)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/participants/{id}",
    params(
        ("id" = Uuid, Path, description = "Participant ID")
    ),
    request_body = UpdateParticipantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participant updated successfully", body = ParticipantResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Participant belongs to another house"),
        (status = 404, description = "Participant not found"),
        (status = 409, description = "Unknown house, finalized results, or an open registration no longer fits")
    ),
    tag = "participants"
)]
pub async fn update_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateParticipantRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let previous = services::get_participant(state.db.pool(), id).await?;

    let scope = scope_of(state.db.pool(), &caller).await?;
    scope.check(previous.house_id)?;
    if let Some(house_id) = update_req.house_id {
        scope.check(house_id)?;
    }

    let participant =
        services::update_participant(state.db.pool(), &previous, &update_req).await?;

    if previous.house_id != participant.house_id {
        // their points move with them
        state.changed([Notification::RefreshLeaderboard {
            tournament_id: participant.tournament_id,
        }]);
    } else {
        state.invalidate();
    }

    Ok(Json(ParticipantResponse::from(participant)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/participants/{id}",
    params(
        ("id" = Uuid, Path, description = "Participant ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Participant and their registrations removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Participant belongs to another house"),
        (status = 404, description = "Participant not found"),
        (status = 409, description = "Participant already has recorded results")
    ),
    tag = "participants"
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let participant = services::get_participant(state.db.pool(), id).await?;
    scope_of(state.db.pool(), &caller)
        .await?
        .check(participant.house_id)?;

    services::delete_participant(state.db.pool(), id).await?;
    state.invalidate();

    Ok(StatusCode::NO_CONTENT.into_response())
}
