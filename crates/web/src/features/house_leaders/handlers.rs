use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::house_leader::{ClaimHouseRequest, HouseLeaderResponse},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::{Caller, Role};

use super::services;

#[utoipa::path(
    get,
    path = "/api/house-leaders",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Claimed houses", body = Vec<HouseLeaderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required")
    ),
    tag = "house-leaders"
)]
pub async fn list_claims(State(db): State<Database>) -> Result<Response, WebError> {
    let claims = services::list_claims(db.pool()).await?;

    Ok(Json(claims).into_response())
}

#[utoipa::path(
    post,
    path = "/api/house-leaders/claim",
    request_body = ClaimHouseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "House claimed by the calling key", body = HouseLeaderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only house-leader keys claim houses"),
        (status = 404, description = "House not found"),
        (status = 409, description = "House already has a leader, or the key already leads one")
    ),
    tag = "house-leaders"
)]
pub async fn claim_house(
    State(db): State<Database>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<ClaimHouseRequest>,
) -> Result<Response, WebError> {
    if caller.role != Role::HouseLeader {
        return Err(WebError::Forbidden);
    }

    let claim = services::claim_house(db.pool(), &caller.key, req.house_id).await?;

    Ok((StatusCode::CREATED, Json(claim)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/house-leaders/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "House claimed by the calling key", body = HouseLeaderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No house claimed yet")
    ),
    tag = "house-leaders"
)]
pub async fn get_own_claim(
    State(db): State<Database>,
    Extension(caller): Extension<Caller>,
) -> Result<Response, WebError> {
    let claim = services::own_claim(db.pool(), &caller.key).await?;

    Ok(Json(claim).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/house-leaders/{house_id}",
    params(
        ("house_id" = Uuid, Path, description = "House ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "House released"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "House has no leader")
    ),
    tag = "house-leaders"
)]
pub async fn release_house(
    State(db): State<Database>,
    Path(house_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::release_house(db.pool(), house_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
