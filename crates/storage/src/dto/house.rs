use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHouseRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateHouseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HouseResponse {
    pub house_id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

/// Accepts `#rgb` and `#rrggbb`
fn validate_color(color: &str) -> Result<(), validator::ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or_default();
    let is_valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());

    if is_valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_color"))
    }
}

impl From<crate::models::House> for HouseResponse {
    fn from(house: crate::models::House) -> Self {
        Self {
            house_id: house.house_id,
            name: house.name,
            color: house.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(color: Option<&str>) -> CreateHouseRequest {
        CreateHouseRequest {
            name: "Kingfisher".to_string(),
            color: color.map(String::from),
        }
    }

    #[test]
    fn test_color_formats() {
        assert!(request(None).validate().is_ok());
        assert!(request(Some("#1e90ff")).validate().is_ok());
        assert!(request(Some("#FFF")).validate().is_ok());
        assert!(request(Some("1e90ff")).validate().is_err());
        assert!(request(Some("#12345")).validate().is_err());
        assert!(request(Some("#gggggg")).validate().is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let req = CreateHouseRequest {
            name: String::new(),
            color: None,
        };
        assert!(req.validate().is_err());
    }
}
