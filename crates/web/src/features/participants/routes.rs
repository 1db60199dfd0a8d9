use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{create_participant, delete_participant, get_participant, update_participant};
use crate::middleware::auth::{ApiKeys, require_house_leader};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_participant))
        .route("/:id", put(update_participant))
        .route("/:id", delete(delete_participant))
        .route_layer(middleware::from_fn_with_state(api_keys, require_house_leader));

    Router::new()
        .route("/:id", get(get_participant))
        .merge(protected)
}
