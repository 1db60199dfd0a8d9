use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Without `tournament_id` the participant joins the active tournament.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateParticipantRequest {
    pub tournament_id: Option<Uuid>,

    pub house_id: Uuid,

    #[validate(length(
        min = 1,
        max = 255,
        message = "First name must be between 1 and 255 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Last name must be between 1 and 255 characters"
    ))]
    pub last_name: String,

    #[validate(length(min = 1, max = 32, message = "Gender division is required"))]
    pub gender_division: String,

    #[validate(length(min = 1, max = 64, message = "Age class is required"))]
    pub age_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateParticipantRequest {
    pub house_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub gender_division: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub age_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub participant_id: Uuid,
    pub tournament_id: Uuid,
    pub house_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender_division: String,
    pub age_class: String,
    pub created_at: chrono::NaiveDateTime,
}

impl From<crate::models::Participant> for ParticipantResponse {
    fn from(p: crate::models::Participant) -> Self {
        Self {
            participant_id: p.participant_id,
            tournament_id: p.tournament_id,
            house_id: p.house_id,
            first_name: p.first_name,
            last_name: p.last_name,
            gender_division: p.gender_division,
            age_class: p.age_class,
            created_at: p.created_at,
        }
    }
}
