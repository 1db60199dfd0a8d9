use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{create_house, delete_house, get_house, list_houses, update_house};
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_house))
        .route("/:id", put(update_house))
        .route("/:id", delete(delete_house))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin));

    Router::new()
        .route("/", get(list_houses))
        .route("/:id", get(get_house))
        .merge(protected)
}
