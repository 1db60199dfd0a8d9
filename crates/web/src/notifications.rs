use std::convert::Infallible;

use axum::response::sse::Event;
use futures::Stream;
use serde::Serialize;
use storage::dto::event::SettlementResponse;
use storage::models::{Announcement, EventStatus, EventUpdate};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// Messages pushed to connected viewers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum Notification {
    ReceiveAnnouncement(Announcement),
    ReceiveEventUpdate(EventUpdate),
    ReceiveResult(SettlementResponse),
    RefreshLeaderboard { tournament_id: Uuid },
    ReceiveEventStatus { event_id: Uuid, status: EventStatus },
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceiveAnnouncement(_) => "ReceiveAnnouncement",
            Self::ReceiveEventUpdate(_) => "ReceiveEventUpdate",
            Self::ReceiveResult(_) => "ReceiveResult",
            Self::RefreshLeaderboard { .. } => "RefreshLeaderboard",
            Self::ReceiveEventStatus { .. } => "ReceiveEventStatus",
        }
    }

    pub fn to_sse_event(&self) -> Result<Event, axum::Error> {
        Event::default().event(self.name()).json_data(self)
    }
}

/// Fire-and-forget broadcaster. Nobody listening is not an error, and a
/// receiver that falls behind skips what it missed.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns how many subscribers the message reached.
    pub fn publish(&self, notification: Notification) -> usize {
        let name = notification.name();
        match self.sender.send(notification) {
            Ok(receivers) => {
                tracing::debug!(message = name, receivers, "Notification published");
                receivers
            }
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn stream(&self) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static + use<> {
        sse_stream(self.subscribe())
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

fn sse_stream(
    receiver: broadcast::Receiver<Notification>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(notification) => match notification.to_sse_event() {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(e) => {
                        tracing::warn!(message = notification.name(), "Failed to encode notification: {}", e);
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn status_change(status: EventStatus) -> Notification {
        Notification::ReceiveEventStatus {
            event_id: Uuid::new_v4(),
            status,
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let notifier = Notifier::default();
        assert_eq!(notifier.publish(status_change(EventStatus::InProgress)), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_message() {
        let notifier = Notifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        let tournament_id = Uuid::new_v4();
        assert_eq!(
            notifier.publish(Notification::RefreshLeaderboard { tournament_id }),
            2
        );

        for receiver in [&mut first, &mut second] {
            match receiver.recv().await.unwrap() {
                Notification::RefreshLeaderboard { tournament_id: id } => {
                    assert_eq!(id, tournament_id)
                }
                other => panic!("unexpected notification: {other:?}"),
            }
        }
    }

    #[test]
    fn test_wire_format_is_tagged_by_name() {
        let notification = status_change(EventStatus::Completed);
        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(json["type"], "ReceiveEventStatus");
        assert_eq!(json["payload"]["status"], "completed");
        assert_eq!(notification.name(), "ReceiveEventStatus");
    }

    #[tokio::test]
    async fn test_lagging_stream_skips_missed_messages() {
        let notifier = Notifier::new(1);
        let mut stream = Box::pin(notifier.stream());

        notifier.publish(status_change(EventStatus::InProgress));
        notifier.publish(status_change(EventStatus::Cancelled));

        assert!(stream.next().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_stream_ends_when_notifier_dropped() {
        let notifier = Notifier::default();
        let mut stream = Box::pin(notifier.stream());
        drop(notifier);

        assert!(stream.next().await.is_none());
    }
}
