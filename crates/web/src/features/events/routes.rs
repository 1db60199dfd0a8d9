use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    add_event_update, change_event_status, create_event, delete_event, finalize_event,
    get_event, get_event_results, list_event_updates, register_participant, settle_event,
    unregister_participant, update_event,
};
use crate::middleware::auth::{ApiKeys, require_admin, require_house_leader};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_event))
        .route("/:id", put(update_event))
        .route("/:id", delete(delete_event))
        .route("/:id/status", post(change_event_status))
        .route("/:id/settle", post(settle_event))
        .route("/:id/finalize", post(finalize_event))
        .route("/:id/updates", post(add_event_update))
        .route_layer(middleware::from_fn_with_state(api_keys.clone(), require_admin));

    let house_leader = Router::new()
        .route("/:id/registrations", post(register_participant))
        .route(
            "/:id/registrations/:participant_id",
            delete(unregister_participant),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_house_leader));

    Router::new()
        .route("/:id", get(get_event))
        .route("/:id/results", get(get_event_results))
        .route("/:id/updates", get(list_event_updates))
        .merge(admin)
        .merge(house_leader)
}
