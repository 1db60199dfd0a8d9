use axum::{Router, middleware, routing::get};

use super::handlers::{get_admin_dashboard, get_public_dashboard};
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/admin", get(get_admin_dashboard))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin));

    Router::new()
        .route("/public", get(get_public_dashboard))
        .merge(protected)
}
