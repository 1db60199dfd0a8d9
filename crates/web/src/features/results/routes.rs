use axum::{Router, middleware, routing::put};

use super::handlers::enter_result;
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/:id", put(enter_result))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin))
}
