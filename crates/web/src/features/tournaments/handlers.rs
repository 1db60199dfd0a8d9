use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::dashboard::LeaderboardResponse,
    dto::tournament::{CreateTournamentRequest, TournamentResponse, UpdateTournamentRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::notifications::Notification;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments",
    responses(
        (status = 200, description = "List all tournaments", body = Vec<TournamentResponse>)
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(
    State(db): State<Database>,
) -> Result<Json<Vec<TournamentResponse>>, WebError> {
    let tournaments = services::list_tournaments(db.pool()).await?;

    let response: Vec<TournamentResponse> = tournaments
        .into_iter()
        .map(TournamentResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/tournaments/active",
    responses(
        (status = 200, description = "The active tournament", body = TournamentResponse),
        (status = 409, description = "No tournament is active")
    ),
    tag = "tournaments"
)]
pub async fn get_active_tournament(State(db): State<Database>) -> Result<Response, WebError> {
    let tournament = services::get_active_tournament(db.pool()).await?;

    Ok(Json(TournamentResponse::from(tournament)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Tournament found", body = TournamentResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), id).await?;

    Ok(Json(TournamentResponse::from(tournament)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/leaderboard",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "House standings for the tournament", body = LeaderboardResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let leaderboard = services::get_leaderboard(db.pool(), id).await?;

    Ok(Json(leaderboard).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments",
    request_body = CreateTournamentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Tournament created successfully", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tournament = services::create_tournament(state.db.pool(), &req).await?;
    state.invalidate();

    Ok((
        StatusCode::CREATED,
        Json(TournamentResponse::from(tournament)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    request_body = UpdateTournamentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Tournament updated successfully", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn update_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateTournamentRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_tournament(state.db.pool(), id, &update_req).await?;
    state.invalidate();

    Ok(Json(TournamentResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Tournament and everything in it deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_tournament(state.db.pool(), id).await?;
    state.invalidate();

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/activate",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Tournament is now the only active one", body = TournamentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Concurrent activation")
    ),
    tag = "tournaments"
)]
pub async fn activate_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::activate_tournament(state.db.pool(), id).await?;
    tracing::info!(tournament_id = %tournament.tournament_id, "Tournament activated");

    state.changed([Notification::RefreshLeaderboard {
        tournament_id: tournament.tournament_id,
    }]);

    Ok(Json(TournamentResponse::from(tournament)).into_response())
}
