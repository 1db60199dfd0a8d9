use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::services::scoring::PointTable;

/// A single race or field event within a tournament.
///
/// `event_type`, `status` and `point_table` are stored as text; use the
/// typed accessors to read them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub event_type: String,
    pub point_table: String,
    pub record_value: Option<Decimal>,
    pub record_holder_id: Option<Uuid>,
    pub status: String,
    pub is_published: bool,
    pub gender_division: Option<String>,
    pub age_class: Option<String>,
    pub scheduled_at: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
}

impl Event {
    pub fn kind(&self) -> Result<EventKind> {
        self.event_type.parse()
    }

    pub fn status(&self) -> Result<EventStatus> {
        self.status.parse()
    }

    pub fn point_table(&self) -> Result<PointTable> {
        self.point_table.parse()
    }
}

/// How measured values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Timed; lower is better
    Speed,
    /// Measured length; higher is better
    Distance,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Distance => "distance",
        }
    }

    /// Whether `candidate` beats `incumbent` for this kind of event.
    pub fn improves_on(&self, candidate: Decimal, incumbent: Decimal) -> bool {
        match self {
            Self::Speed => candidate < incumbent,
            Self::Distance => candidate > incumbent,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "speed" => Ok(Self::Speed),
            "distance" => Ok(Self::Distance),
            other => Err(StorageError::ConstraintViolation(format!(
                "Unknown event type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::InProgress)
                | (Self::Scheduled, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    pub fn transition_to(&self, next: EventStatus) -> Result<EventStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StorageError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }

    /// Results may still be entered, settled or removed.
    pub fn accepts_results(&self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StorageError::ConstraintViolation(format!(
                "Unknown event status '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EventStatus; 4] = [
        EventStatus::Scheduled,
        EventStatus::InProgress,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ];

    #[test]
    fn test_legal_transitions() {
        assert!(EventStatus::Scheduled.can_transition_to(EventStatus::InProgress));
        assert!(EventStatus::Scheduled.can_transition_to(EventStatus::Cancelled));
        assert!(EventStatus::InProgress.can_transition_to(EventStatus::Completed));
        assert!(EventStatus::InProgress.can_transition_to(EventStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in ALL {
            assert!(!EventStatus::Completed.can_transition_to(next));
            assert!(!EventStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_scheduled_cannot_skip_to_completed() {
        let err = EventStatus::Scheduled
            .transition_to(EventStatus::Completed)
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidTransition {
                from: EventStatus::Scheduled,
                to: EventStatus::Completed
            }
        ));
    }

    #[test]
    fn test_self_transition_rejected() {
        for status in ALL {
            assert!(status.transition_to(status).is_err());
        }
    }

    #[test]
    fn test_status_text_round_trip() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("registering".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("Speed".parse::<EventKind>().unwrap(), EventKind::Speed);
        assert_eq!("DISTANCE".parse::<EventKind>().unwrap(), EventKind::Distance);
        assert!("height".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_improves_on_direction() {
        let fast = Decimal::new(118, 1);
        let slow = Decimal::new(120, 1);
        assert!(EventKind::Speed.improves_on(fast, slow));
        assert!(!EventKind::Speed.improves_on(slow, fast));
        assert!(EventKind::Distance.improves_on(slow, fast));
        assert!(!EventKind::Distance.improves_on(fast, fast));
    }
}
