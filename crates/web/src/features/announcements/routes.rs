use axum::{
    Router, middleware,
    routing::{delete, post},
};

use super::handlers::{create_announcement, delete_announcement};
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/", post(create_announcement))
        .route("/:id", delete(delete_announcement))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin))
}
