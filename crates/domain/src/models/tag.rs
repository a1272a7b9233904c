//! Tag domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A physical BLE-broadcasting identity attached to at most one asset.
///
/// The tag name is what readers observe over the air, so it is the join key
/// between broadcast identity and the logical asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag listing item with the owning asset, if any.
#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    pub id: i64,
    pub name: String,
    pub asset_name: Option<String>,
}

/// Request payload for creating a tag.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,
}

/// Request payload for renaming a tag.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_summary_serialization() {
        let summary = TagSummary {
            id: 3,
            name: "TAG-0003".to_string(),
            asset_name: None,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"asset_name\":null"));
    }

    #[test]
    fn test_create_tag_request_rejects_blank_name() {
        let request = CreateTagRequest {
            name: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
