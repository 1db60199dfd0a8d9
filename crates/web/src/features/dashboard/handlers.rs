use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::dashboard::{AdminDashboardResponse, PublicDashboardResponse};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/dashboard/public",
    responses(
        (status = 200, description = "Active tournament, latest announcements, leaderboard and counts", body = PublicDashboardResponse),
        (status = 409, description = "No active tournament")
    ),
    tag = "dashboard"
)]
pub async fn get_public_dashboard(State(state): State<AppState>) -> Result<Response, WebError> {
    let dashboard = services::public_dashboard(&state.dashboards, state.db.pool()).await?;

    Ok(Json(dashboard.as_ref()).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Global counts, active tournament and recent activity", body = AdminDashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required")
    ),
    tag = "dashboard"
)]
pub async fn get_admin_dashboard(State(state): State<AppState>) -> Result<Response, WebError> {
    let dashboard = services::admin_dashboard(&state.dashboards, state.db.pool()).await?;

    Ok(Json(dashboard.as_ref()).into_response())
}
