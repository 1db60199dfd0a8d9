use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for creating a new tournament
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 255))]
    pub venue: Option<String>,

    pub event_date: NaiveDate,
}

/// Request payload for updating an existing tournament
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 255))]
    pub venue: Option<String>,

    pub event_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub tournament_id: Uuid,
    pub name: String,
    pub venue: Option<String>,
    pub event_date: NaiveDate,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<crate::models::Tournament> for TournamentResponse {
    fn from(t: crate::models::Tournament) -> Self {
        Self {
            tournament_id: t.tournament_id,
            name: t.name,
            venue: t.venue,
            event_date: t.event_date,
            is_active: t.is_active,
            created_at: t.created_at,
        }
    }
}
