//! Asset location log entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::location_log::LogHistoryItem;
use domain::models::{ObservationStatus, ObservationType};

/// Database row mapping for the asset_location_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationLogEntity {
    pub id: i64,
    pub asset_id: i64,
    pub location_id: i64,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub log_type: String,
    pub status: String,
    pub reader_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationLogEntity> for domain::models::AssetLocationLog {
    fn from(entity: LocationLogEntity) -> Self {
        Self {
            id: entity.id,
            asset_id: entity.asset_id,
            location_id: entity.location_id,
            rssi: entity.rssi,
            kalman_rssi: entity.kalman_rssi,
            estimated_distance: entity.estimated_distance,
            log_type: entity
                .log_type
                .parse()
                .unwrap_or(ObservationType::Heartbeat),
            status: entity.status.parse().unwrap_or(ObservationStatus::Present),
            reader_name: entity.reader_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Log row joined with its location name, for asset history listings.
#[derive(Debug, Clone, FromRow)]
pub struct LogHistoryEntity {
    pub id: i64,
    pub location_name: Option<String>,
    pub log_type: String,
    pub status: String,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub reader_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LogHistoryEntity> for LogHistoryItem {
    fn from(entity: LogHistoryEntity) -> Self {
        Self {
            id: entity.id,
            location_name: entity.location_name,
            log_type: entity
                .log_type
                .parse()
                .unwrap_or(ObservationType::Heartbeat),
            status: entity.status.parse().unwrap_or(ObservationStatus::Present),
            rssi: entity.rssi,
            kalman_rssi: entity.kalman_rssi,
            estimated_distance: entity.estimated_distance,
            reader_name: entity.reader_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Log row joined with asset and location names, for the dashboard table.
#[derive(Debug, Clone, FromRow)]
pub struct LogWithNamesEntity {
    pub id: i64,
    pub asset_id: i64,
    pub asset_name: Option<String>,
    pub location_name: Option<String>,
    pub log_type: String,
    pub status: String,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub reader_name: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entity_to_domain() {
        let entity = LocationLogEntity {
            id: 99,
            asset_id: 7,
            location_id: 2,
            rssi: Some(-61.5),
            kalman_rssi: Some(-60.2),
            estimated_distance: Some(1.8),
            log_type: "alert".to_string(),
            status: "out_of_range".to_string(),
            reader_name: "READER-01".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let log: domain::models::AssetLocationLog = entity.into();
        assert_eq!(log.log_type, ObservationType::Alert);
        assert_eq!(log.status, ObservationStatus::OutOfRange);
        assert_eq!(log.rssi, Some(-61.5));
    }

    #[test]
    fn test_history_entity_to_item() {
        let entity = LogHistoryEntity {
            id: 99,
            location_name: Some("Pharmacy".to_string()),
            log_type: "heartbeat".to_string(),
            status: "present".to_string(),
            rssi: None,
            kalman_rssi: None,
            estimated_distance: Some(-1.0),
            reader_name: "READER-01".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let item: LogHistoryItem = entity.into();
        assert_eq!(item.location_name.as_deref(), Some("Pharmacy"));
        assert_eq!(item.estimated_distance, Some(-1.0));
    }
}
