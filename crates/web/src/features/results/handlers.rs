use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{dto::result::EnterResultRequest, models::EventResult};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    put,
    path = "/api/results/{id}",
    params(
        ("id" = Uuid, Path, description = "Result ID")
    ),
    request_body = EnterResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Entry stored; points follow on the next settlement", body = EventResult),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Result not found"),
        (status = 409, description = "Event is completed or cancelled")
    ),
    tag = "results"
)]
pub async fn enter_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EnterResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let result = services::enter_result(state.db.pool(), id, &req).await?;
    state.invalidate();

    Ok(Json(result).into_response())
}
