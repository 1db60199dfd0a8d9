use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{claim_house, get_own_claim, list_claims, release_house};
use crate::middleware::auth::{ApiKeys, require_admin, require_house_leader};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_claims))
        .route("/:house_id", delete(release_house))
        .route_layer(middleware::from_fn_with_state(api_keys.clone(), require_admin));

    let house_leader = Router::new()
        .route("/claim", post(claim_house))
        .route("/me", get(get_own_claim))
        .route_layer(middleware::from_fn_with_state(api_keys, require_house_leader));

    Router::new().merge(admin).merge(house_leader)
}
