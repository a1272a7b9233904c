//! Asset domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Whether an asset is expected to move between locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stationary,
    #[default]
    Mobile,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stationary => "stationary",
            Self::Mobile => "mobile",
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stationary" => Ok(Self::Stationary),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown asset type: {other}")),
        }
    }
}

/// A tracked asset.
///
/// `location_id` is the asset's current resolved location; ingestion is the
/// only writer once the asset exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub asset_type: AssetType,
    pub location_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Asset listing item with joined tag and location names.
#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub id: i64,
    pub name: String,
    pub asset_type: AssetType,
    pub tag_name: Option<String>,
    pub location_name: Option<String>,
}

/// Asset detail with its most recent log row, for the show view.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub last_log: Option<crate::models::location_log::AssetLocationLog>,
}

/// Request payload for creating an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,

    #[serde(default)]
    pub asset_type: AssetType,

    /// Tag to bind; a tag can belong to at most one asset.
    pub tag_id: Option<i64>,

    /// Initial location, if known.
    pub location_id: Option<i64>,
}

/// Request payload for updating an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,

    pub asset_type: AssetType,

    pub tag_id: Option<i64>,

    pub location_id: Option<i64>,
}
