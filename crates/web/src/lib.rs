pub mod config;
pub mod docs;
pub mod error;
pub mod features;
pub mod middleware;
pub mod notifications;
pub mod state;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::features::{
    announcements, dashboard, events, house_leaders, houses, notifications as live, participants,
    results, tournaments,
};
use crate::state::AppState;

/// Builds the full router: API routes, Swagger UI, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let api_keys = state.api_keys.clone();

    let api = Router::new()
        .nest("/api/tournaments", tournaments::routes::routes(api_keys.clone()))
        .nest("/api/houses", houses::routes::routes(api_keys.clone()))
        .nest("/api/house-leaders", house_leaders::routes::routes(api_keys.clone()))
        .nest("/api/events", events::routes::routes(api_keys.clone()))
        .nest("/api/participants", participants::routes::routes(api_keys.clone()))
        .nest("/api/results", results::routes::routes(api_keys.clone()))
        .nest("/api/announcements", announcements::routes::routes(api_keys.clone()))
        .nest("/api/dashboard", dashboard::routes::routes(api_keys))
        .nest("/api/notifications", live::routes::routes())
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
