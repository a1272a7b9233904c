//! Asset entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::asset::AssetSummary;

/// Database row mapping for the assets table.
#[derive(Debug, Clone, FromRow)]
pub struct AssetEntity {
    pub id: i64,
    pub name: String,
    pub asset_type: String,
    pub location_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssetEntity> for domain::models::Asset {
    fn from(entity: AssetEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            asset_type: entity.asset_type.parse().unwrap_or_default(),
            location_id: entity.location_id,
            tag_id: entity.tag_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Asset row joined with tag and location names, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct AssetSummaryEntity {
    pub id: i64,
    pub name: String,
    pub asset_type: String,
    pub tag_name: Option<String>,
    pub location_name: Option<String>,
}

impl From<AssetSummaryEntity> for AssetSummary {
    fn from(entity: AssetSummaryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            asset_type: entity.asset_type.parse().unwrap_or_default(),
            tag_name: entity.tag_name,
            location_name: entity.location_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::AssetType;

    #[test]
    fn test_asset_entity_to_domain() {
        let entity = AssetEntity {
            id: 7,
            name: "Infusion Pump 7".to_string(),
            asset_type: "stationary".to_string(),
            location_id: Some(2),
            tag_id: Some(9),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let asset: domain::models::Asset = entity.into();
        assert_eq!(asset.asset_type, AssetType::Stationary);
        assert_eq!(asset.location_id, Some(2));
        assert_eq!(asset.tag_id, Some(9));
    }

    #[test]
    fn test_unknown_asset_type_defaults_to_mobile() {
        let entity = AssetEntity {
            id: 7,
            name: "Mystery".to_string(),
            asset_type: "hovering".to_string(),
            location_id: None,
            tag_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let asset: domain::models::Asset = entity.into();
        assert_eq!(asset.asset_type, AssetType::Mobile);
    }
}
