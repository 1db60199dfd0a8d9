use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::house::{CreateHouseRequest, HouseResponse, UpdateHouseRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/houses",
    responses(
        (status = 200, description = "List all houses", body = Vec<HouseResponse>)
    ),
    tag = "houses"
)]
pub async fn list_houses(State(db): State<Database>) -> Result<Json<Vec<HouseResponse>>, WebError> {
    let houses = services::list_houses(db.pool()).await?;

    Ok(Json(houses.into_iter().map(HouseResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/houses/{id}",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    responses(
        (status = 200, description = "House found", body = HouseResponse),
        (status = 404, description = "House not found")
    ),
    tag = "houses"
)]
pub async fn get_house(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let house = services::get_house(db.pool(), id).await?;

    Ok(Json(HouseResponse::from(house)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/houses",
    request_body = CreateHouseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "House created successfully", body = HouseResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 409, description = "House name already exists")
    ),
    tag = "houses"
)]
pub async fn create_house(
    State(state): State<AppState>,
    Json(req): Json<CreateHouseRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let house = services::create_house(state.db.pool(), &req).await?;
    state.invalidate();

    Ok((StatusCode::CREATED, Json(HouseResponse::from(house))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/houses/{id}",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    request_body = UpdateHouseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "House updated successfully", body = HouseResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "House not found"),
        (status = 409, description = "House name already exists")
    ),
    tag = "houses"
)]
pub async fn update_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateHouseRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let house = services::update_house(state.db.pool(), id, &update_req).await?;
    state.invalidate();

    Ok(Json(HouseResponse::from(house)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/houses/{id}",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "House deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "House not found"),
        (status = 409, description = "House still has participants or results")
    ),
    tag = "houses"
)]
pub async fn delete_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_house(state.db.pool(), id).await?;
    state.invalidate();

    Ok(StatusCode::NO_CONTENT.into_response())
}
