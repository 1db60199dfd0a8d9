use std::sync::Arc;

use sqlx::PgPool;
use storage::{
    dto::dashboard::{AdminDashboardResponse, PublicDashboardResponse},
    error::Result,
    services::dashboard::DashboardService,
};

/// Served from cache while fresh
pub async fn admin_dashboard(
    dashboards: &DashboardService,
    pool: &PgPool,
) -> Result<Arc<AdminDashboardResponse>> {
    dashboards.admin(pool).await
}

/// Served from cache while fresh; requires an active tournament
pub async fn public_dashboard(
    dashboards: &DashboardService,
    pool: &PgPool,
) -> Result<Arc<PublicDashboardResponse>> {
    dashboards.public(pool).await
}
