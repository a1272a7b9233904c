//! Location domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named zone a reader is installed in and assets are attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub floor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,

    #[validate(length(max = 255, message = "Floor must be at most 255 characters"))]
    pub floor: Option<String>,
}

/// Request payload for updating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,

    #[validate(length(max = 255, message = "Floor must be at most 255 characters"))]
    pub floor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validates_name() {
        let request = CreateLocationRequest {
            name: "Ward 3 East".to_string(),
            floor: Some("3".to_string()),
        };
        assert!(request.validate().is_ok());

        let request = CreateLocationRequest {
            name: "  ".to_string(),
            floor: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_location_serialization() {
        let location = Location {
            id: 1,
            name: "Pharmacy".to_string(),
            floor: Some("G".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&location).unwrap();
        assert!(json.contains("\"name\":\"Pharmacy\""));
        assert!(json.contains("\"floor\":\"G\""));
    }
}
