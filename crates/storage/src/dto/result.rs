use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::event::EventResponse;

/// Raw entry for one result. Replaces whatever was entered before; points
/// are never taken from the client and are recomputed on settlement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct EnterResultRequest {
    #[validate(range(min = 1, message = "Placement must be 1 or greater"))]
    pub placement: Option<i32>,

    /// Seconds for speed events, metres for distance events
    #[validate(custom(function = "validate_measurement"))]
    pub value: Option<Decimal>,

    /// `DQ`, `DNS`, `DNF` or free text
    #[validate(length(min = 1, max = 64))]
    pub label: Option<String>,

    #[serde(default)]
    pub is_disqualified: bool,
}

/// Result row joined with the participant and house it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResultDetail {
    pub result_id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub house_id: Uuid,
    pub house_name: String,
    pub placement: Option<i32>,
    pub value: Option<Decimal>,
    pub points: i32,
    pub is_new_record: bool,
    pub is_disqualified: bool,
    pub label: Option<String>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResultsResponse {
    pub event: EventResponse,
    pub results: Vec<ResultDetail>,
}

/// Largest scale the `NUMERIC(12, 3)` value column stores without rounding
const MEASUREMENT_SCALE: u32 = 3;

/// Must fit `NUMERIC(12, 3)`: non-negative, below 10^9, at most 3 decimals.
fn validate_measurement(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_measurement"));
    }
    if *value >= Decimal::new(1_000_000_000, 0) {
        return Err(validator::ValidationError::new("measurement_too_large"));
    }
    if value.normalize().scale() > MEASUREMENT_SCALE {
        return Err(validator::ValidationError::new("measurement_too_precise"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_placement_rejected() {
        let req = EnterResultRequest {
            placement: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_value_rejected() {
        let req = EnterResultRequest {
            value: Some(Decimal::new(-15, 1)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    fn with_value(value: Decimal) -> EnterResultRequest {
        EnterResultRequest {
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_value_must_fit_stored_column() {
        assert!(with_value(Decimal::new(999_999_999_999, 3)).validate().is_ok());
        assert!(with_value(Decimal::new(1_000_000_000, 0)).validate().is_err());
    }

    #[test]
    fn test_value_limited_to_thousandths() {
        assert!(with_value(Decimal::new(11_805, 3)).validate().is_ok());
        // trailing zeros do not count
        assert!(with_value(Decimal::new(118_000, 4)).validate().is_ok());
        assert!(with_value(Decimal::new(118_001, 4)).validate().is_err());
    }

    #[test]
    fn test_label_only_entry_is_valid() {
        let req: EnterResultRequest =
            serde_json::from_value(serde_json::json!({ "label": "DNS" })).unwrap();
        assert!(req.validate().is_ok());
        assert!(!req.is_disqualified);
    }
}
