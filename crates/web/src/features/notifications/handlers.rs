use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;

use crate::notifications::Notifier;

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Server-sent events named ReceiveAnnouncement, ReceiveEventUpdate, ReceiveResult, RefreshLeaderboard or ReceiveEventStatus with a JSON payload", content_type = "text/event-stream", body = String)
    ),
    tag = "notifications"
)]
pub async fn stream_notifications(
    State(notifier): State<Notifier>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Notification subscriber connected");

    Sse::new(notifier.stream()).keep_alive(KeepAlive::default())
}
