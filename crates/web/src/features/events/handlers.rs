use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::event::{
        ChangeEventStatusRequest, CreateEventRequest, CreateEventUpdateRequest, EventResponse,
        RegisterParticipantRequest, SettlementResponse, UpdateEventRequest,
    },
    dto::result::EventResultsResponse,
    models::{EventResult, EventUpdate},
    services::settlement::SettlementOutcome,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::house_leaders::services::scope_of;
use crate::features::participants::services::get_participant;
use crate::middleware::auth::Caller;
use crate::notifications::Notification;
use crate::state::AppState;

use super::services::{self, StatusChange};

/// Messages announcing a settlement pass to viewers
fn settlement_notifications(
    outcome: &SettlementOutcome,
    response: &SettlementResponse,
) -> Vec<Notification> {
    let mut notifications = vec![
        Notification::ReceiveResult(response.clone()),
        Notification::RefreshLeaderboard {
            tournament_id: outcome.event.tournament_id,
        },
    ];

    if outcome.status_changed() {
        notifications.push(Notification::ReceiveEventStatus {
            event_id: response.event_id,
            status: response.status,
        });
    }

    notifications
}

fn publish_settlement(
    state: &AppState,
    outcome: &SettlementOutcome,
) -> Result<SettlementResponse, WebError> {
    let response = outcome.to_response()?;
    state.changed(settlement_notifications(outcome, &response));
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/events",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Events of the tournament", body = Vec<EventResponse>),
        (status = 404, description = "Tournament not found")
    ),
    tag = "events"
)]
pub async fn list_tournament_events(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let events = services::list_events(db.pool(), id).await?;

    let response = events
        .into_iter()
        .map(EventResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_event(db.pool(), id).await?;

    Ok(Json(EventResponse::try_from(event)?).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/results",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event with its results, placed entries first", body = EventResultsResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event_results(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let results = services::get_event_results(db.pool(), id).await?;

    Ok(Json(results).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/updates",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Progress updates, newest first", body = Vec<EventUpdate>),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn list_event_updates(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let updates = services::list_event_updates(db.pool(), id).await?;

    Ok(Json(updates).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Event created successfully", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "No active tournament")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::create_event(state.db.pool(), &req).await?;
    state.invalidate();

    Ok((StatusCode::CREATED, Json(EventResponse::try_from(event)?)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event is completed or cancelled")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateEventRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let event = services::update_event(state.db.pool(), id, &update_req).await?;
    state.invalidate();

    Ok(Json(EventResponse::try_from(event)?).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Event and its results deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event has been finalized")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_event(state.db.pool(), id).await?;
    state.invalidate();

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = ChangeEventStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status changed; completing an event also settles and publishes it", body = EventResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "events"
)]
pub async fn change_event_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeEventStatusRequest>,
) -> Result<Response, WebError> {
    let event = match services::change_status(state.db.pool(), id, req.status).await? {
        StatusChange::Finalized(outcome) => {
            publish_settlement(&state, &outcome)?;
            outcome.event
        }
        StatusChange::Moved { event, previous } => {
            tracing::info!(
                event_id = %event.event_id,
                from = %previous,
                to = %event.status,
                "Event status changed"
            );
            state.changed([Notification::ReceiveEventStatus {
                event_id: event.event_id,
                status: event.status()?,
            }]);
            event
        }
    };

    Ok(Json(EventResponse::try_from(event)?).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/settle",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Placements, points and record recomputed", body = SettlementResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event is frozen or being settled concurrently"),
        (status = 422, description = "Event point table is malformed")
    ),
    tag = "events"
)]
pub async fn settle_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let outcome = services::settle_event(state.db.pool(), id).await?;
    let response = publish_settlement(&state, &outcome)?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/finalize",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event settled, completed and published", body = SettlementResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event cannot be completed from its current status"),
        (status = 422, description = "Event point table is malformed")
    ),
    tag = "events"
)]
pub async fn finalize_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let outcome = services::finalize_event(state.db.pool(), id).await?;
    let response = publish_settlement(&state, &outcome)?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/updates",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = CreateEventUpdateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Progress update posted", body = EventUpdate),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator key required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn add_event_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateEventUpdateRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let update = services::add_event_update(state.db.pool(), id, &req.message).await?;
    state.changed([Notification::ReceiveEventUpdate(update.clone())]);

    Ok((StatusCode::CREATED, Json(update)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/registrations",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = RegisterParticipantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Participant registered; their empty result is returned", body = EventResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Participant belongs to another house"),
        (status = 404, description = "Event or participant not found"),
        (status = 409, description = "Already registered, not eligible, or event closed")
    ),
    tag = "events"
)]
pub async fn register_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegisterParticipantRequest>,
) -> Result<Response, WebError> {
    let participant = get_participant(state.db.pool(), req.participant_id).await?;
    scope_of(state.db.pool(), &caller)
        .await?
        .check(participant.house_id)?;

    let result = services::register_participant(state.db.pool(), id, &participant).await?;
    state.invalidate();

    Ok((StatusCode::CREATED, Json(result)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}/registrations/{participant_id}",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("participant_id" = Uuid, Path, description = "Participant ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Registration removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Participant belongs to another house"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Participant already placed or event closed")
    ),
    tag = "events"
)]
pub async fn unregister_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let participant = get_participant(state.db.pool(), participant_id).await?;
    scope_of(state.db.pool(), &caller)
        .await?
        .check(participant.house_id)?;

    services::unregister_participant(state.db.pool(), id, participant_id).await?;
    state.invalidate();

    Ok(StatusCode::NO_CONTENT.into_response())
}
