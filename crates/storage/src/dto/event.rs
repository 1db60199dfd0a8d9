use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::StorageError;
use crate::models::{Event, EventKind, EventStatus};
use crate::services::scoring::PointTable;

/// Request payload for creating a new event.
///
/// Without `tournament_id` the event is created in the active tournament.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    pub tournament_id: Option<Uuid>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub event_type: EventKind,

    /// Comma separated points per placement, first place first
    #[validate(custom(function = "validate_point_table"))]
    #[schema(example = "9,7,6,5,4,3,2,1")]
    pub point_table: String,

    #[validate(length(min = 1, max = 32))]
    pub gender_division: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub age_class: Option<String>,

    pub scheduled_at: Option<NaiveDateTime>,
}

/// Request payload for updating an event that has not been completed
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_point_table"))]
    pub point_table: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub gender_division: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub age_class: Option<String>,

    pub scheduled_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeEventStatusRequest {
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventUpdateRequest {
    #[validate(length(min = 1, max = 2000, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterParticipantRequest {
    pub participant_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub event_id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub event_type: EventKind,
    pub point_table: Vec<i32>,
    pub record_value: Option<Decimal>,
    pub record_holder_id: Option<Uuid>,
    pub status: EventStatus,
    pub is_published: bool,
    pub gender_division: Option<String>,
    pub age_class: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Event> for EventResponse {
    type Error = StorageError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        Ok(Self {
            event_type: event.kind()?,
            status: event.status()?,
            point_table: event.point_table()?.as_slice().to_vec(),
            event_id: event.event_id,
            tournament_id: event.tournament_id,
            name: event.name,
            record_value: event.record_value,
            record_holder_id: event.record_holder_id,
            is_published: event.is_published,
            gender_division: event.gender_division,
            age_class: event.age_class,
            scheduled_at: event.scheduled_at,
            created_at: event.created_at,
        })
    }
}

/// Outcome of a settlement pass
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettlementResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub status: EventStatus,
    pub results_settled: usize,
    pub placed: usize,
    pub new_record: Option<RecordInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordInfo {
    pub value: Decimal,
    pub holder_id: Uuid,
    pub result_id: Uuid,
}

fn validate_point_table(point_table: &str) -> Result<(), validator::ValidationError> {
    point_table
        .parse::<PointTable>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_point_table"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(point_table: &str) -> CreateEventRequest {
        CreateEventRequest {
            tournament_id: None,
            name: "100m Sprint".to_string(),
            event_type: EventKind::Speed,
            point_table: point_table.to_string(),
            gender_division: Some("F".to_string()),
            age_class: Some("U12".to_string()),
            scheduled_at: None,
        }
    }

    #[test]
    fn test_valid_event_request() {
        assert!(request("9,7,6,5,4,3,2,1").validate().is_ok());
    }

    #[test]
    fn test_malformed_point_table_rejected() {
        let errors = request("9,7,x").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("point_table"));
    }

    #[test]
    fn test_event_type_deserializes_lowercase() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "name": "Long Jump",
            "event_type": "distance",
            "point_table": "5,3,1"
        }))
        .unwrap();
        assert_eq!(req.event_type, EventKind::Distance);
        assert!(req.tournament_id.is_none());
    }
}
