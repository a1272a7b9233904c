//! Reader entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::reader::ReaderConfig;

/// Database row mapping for the readers table.
///
/// `discovery_mode` and `config` are stored as text/JSONB and converted to
/// their typed forms when mapping into the domain model. Stored configs are
/// validated on the admin write path, so a failed parse here means the row
/// predates the current schema; it degrades to "no config" (the default is
/// served) rather than failing the lookup.
#[derive(Debug, Clone, FromRow)]
pub struct ReaderEntity {
    pub id: i64,
    pub name: String,
    pub location_id: Option<i64>,
    pub active: bool,
    pub discovery_mode: String,
    pub config: Option<serde_json::Value>,
    pub config_fetched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReaderEntity> for domain::models::Reader {
    fn from(entity: ReaderEntity) -> Self {
        let config: Option<ReaderConfig> = entity.config.and_then(|value| {
            serde_json::from_value(value)
                .map_err(|e| {
                    tracing::warn!(reader = %entity.name, error = %e, "Stored reader config failed to parse; serving defaults");
                })
                .ok()
        });
        Self {
            id: entity.id,
            name: entity.name,
            location_id: entity.location_id,
            active: entity.active,
            discovery_mode: entity.discovery_mode.parse().unwrap_or_default(),
            config,
            config_fetched_at: entity.config_fetched_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Tag row with the asset it is bound to, for reader listings.
#[derive(Debug, Clone, FromRow)]
pub struct ReaderTagEntity {
    pub id: i64,
    pub name: String,
    pub asset_name: Option<String>,
}

impl From<ReaderTagEntity> for domain::models::reader::ReaderTagInfo {
    fn from(entity: ReaderTagEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            asset_name: entity.asset_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::reader::DiscoveryMode;
    use domain::models::DEFAULT_READER_CONFIG;

    fn entity(config: Option<serde_json::Value>) -> ReaderEntity {
        ReaderEntity {
            id: 1,
            name: "READER-01".to_string(),
            location_id: Some(2),
            active: true,
            discovery_mode: "pattern".to_string(),
            config,
            config_fetched_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_reader_entity_to_domain() {
        let config = serde_json::to_value(DEFAULT_READER_CONFIG).unwrap();
        let reader: domain::models::Reader = entity(Some(config)).into();
        assert_eq!(reader.discovery_mode, DiscoveryMode::Pattern);
        assert_eq!(reader.config, Some(DEFAULT_READER_CONFIG));
    }

    #[test]
    fn test_missing_config_maps_to_none() {
        let reader: domain::models::Reader = entity(None).into();
        assert!(reader.config.is_none());
    }

    #[test]
    fn test_unparseable_config_degrades_to_none() {
        let reader: domain::models::Reader =
            entity(Some(serde_json::json!({"txPower": "loud"}))).into();
        assert!(reader.config.is_none());
    }

    #[test]
    fn test_unknown_discovery_mode_defaults_to_explicit() {
        let mut e = entity(None);
        e.discovery_mode = "promiscuous".to_string();
        let reader: domain::models::Reader = e.into();
        assert_eq!(reader.discovery_mode, DiscoveryMode::Explicit);
    }
}
