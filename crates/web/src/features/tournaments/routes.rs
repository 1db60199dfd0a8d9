use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    activate_tournament, create_tournament, delete_tournament, get_active_tournament,
    get_leaderboard, get_tournament, list_tournaments, update_tournament,
};
use crate::features::{announcements, events, participants};
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_tournament))
        .route("/:id", put(update_tournament))
        .route("/:id", delete(delete_tournament))
        .route("/:id/activate", post(activate_tournament))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin));

    Router::new()
        .route("/", get(list_tournaments))
        .route("/active", get(get_active_tournament))
        .route("/:id", get(get_tournament))
        .route("/:id/leaderboard", get(get_leaderboard))
        .route("/:id/events", get(events::handlers::list_tournament_events))
        .route(
            "/:id/participants",
            get(participants::handlers::list_tournament_participants),
        )
        .route(
            "/:id/announcements",
            get(announcements::handlers::list_tournament_announcements),
        )
        .merge(protected)
}
