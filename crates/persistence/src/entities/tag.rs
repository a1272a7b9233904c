//! Tag entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::tag::TagSummary;

/// Database row mapping for the tags table.
#[derive(Debug, Clone, FromRow)]
pub struct TagEntity {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TagEntity> for domain::models::Tag {
    fn from(entity: TagEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Tag row joined with the owning asset's name, if any.
#[derive(Debug, Clone, FromRow)]
pub struct TagWithAssetEntity {
    pub id: i64,
    pub name: String,
    pub asset_name: Option<String>,
}

impl From<TagWithAssetEntity> for TagSummary {
    fn from(entity: TagWithAssetEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            asset_name: entity.asset_name,
        }
    }
}
