//! Reader domain model and typed reader configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// How a reader decides which tags to scan for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Scan for any tag whose name matches the configured prefix.
    Pattern,
    /// Scan only the tags explicitly associated with this reader.
    #[default]
    Explicit,
}

impl DiscoveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Explicit => "explicit",
        }
    }
}

impl FromStr for DiscoveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pattern" => Ok(Self::Pattern),
            "explicit" => Ok(Self::Explicit),
            other => Err(format!("unknown discovery mode: {other}")),
        }
    }
}

/// Kalman filter seed parameters for the on-device RSSI filter.
///
/// Field names match the firmware wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct KalmanSeed {
    #[serde(rename = "P")]
    #[validate(range(min = 0.0, message = "Kalman P must not be negative"))]
    pub p: f64,

    #[serde(rename = "Q")]
    #[validate(range(min = 0.0, message = "Kalman Q must not be negative"))]
    pub q: f64,

    #[serde(rename = "R")]
    #[validate(range(min = 0.0, message = "Kalman R must not be negative"))]
    pub r: f64,

    #[serde(rename = "initial")]
    #[validate(range(min = -127.0, max = 0.0, message = "Kalman seed must be a plausible RSSI"))]
    pub initial: f64,
}

/// Typed reader configuration.
///
/// Serialized with the camelCase field names the reader firmware expects.
/// Ranges are validated at the admin boundary so stored configs are always
/// well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReaderConfig {
    /// Calibrated transmit power at 1 m, in dBm.
    #[validate(range(min = -120, max = 20, message = "txPower must be between -120 and 20 dBm"))]
    pub tx_power: i32,

    #[validate(range(min = 1.0, max = 6.0, message = "pathLossExponent must be between 1 and 6"))]
    pub path_loss_exponent: f64,

    /// Detection range cutoff in meters.
    #[validate(range(min = 0.1, max = 100.0, message = "maxDistance must be between 0.1 and 100 meters"))]
    pub max_distance: f64,

    #[validate(range(min = 1, max = 100, message = "sampleCount must be between 1 and 100"))]
    pub sample_count: u32,

    #[validate(range(min = 10, max = 10000, message = "sampleDelayMs must be between 10 and 10000"))]
    pub sample_delay_ms: u64,

    #[validate(nested)]
    pub kalman: KalmanSeed,
}

/// Process-wide default configuration served to readers without a
/// reader-specific config row.
pub const DEFAULT_READER_CONFIG: ReaderConfig = ReaderConfig {
    tx_power: -68,
    path_loss_exponent: 2.5,
    max_distance: 5.0,
    sample_count: 5,
    sample_delay_ms: 100,
    kalman: KalmanSeed {
        p: 1.0,
        q: 0.1,
        r: 2.0,
        initial: -60.0,
    },
};

/// A fixed scanning device installed at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reader {
    pub id: i64,
    pub name: String,
    pub location_id: Option<i64>,
    pub active: bool,
    pub discovery_mode: DiscoveryMode,
    pub config: Option<ReaderConfig>,
    pub config_fetched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag entry in a reader listing, with the asset the tag is bound to.
#[derive(Debug, Clone, Serialize)]
pub struct ReaderTagInfo {
    pub id: i64,
    pub name: String,
    pub asset_name: Option<String>,
}

/// Reader listing item.
#[derive(Debug, Clone, Serialize)]
pub struct ReaderSummary {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub discovery_mode: DiscoveryMode,
    pub location_name: Option<String>,
    pub config: Option<ReaderConfig>,
    pub config_fetched_at: Option<DateTime<Utc>>,
    pub tags: Vec<ReaderTagInfo>,
}

/// Request payload for creating a reader.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReaderRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,

    pub location_id: i64,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub discovery_mode: DiscoveryMode,

    #[validate(nested)]
    pub config: Option<ReaderConfig>,

    /// Explicit scan targets; only meaningful for explicit discovery mode.
    pub tag_ids: Option<Vec<i64>>,
}

/// Request payload for updating a reader.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReaderRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "shared::validation::validate_entity_name"))]
    pub name: String,

    pub location_id: i64,

    pub active: bool,

    pub discovery_mode: DiscoveryMode,

    #[validate(nested)]
    pub config: Option<ReaderConfig>,

    pub tag_ids: Option<Vec<i64>>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(DEFAULT_READER_CONFIG.tx_power, -68);
        assert_eq!(DEFAULT_READER_CONFIG.path_loss_exponent, 2.5);
        assert_eq!(DEFAULT_READER_CONFIG.max_distance, 5.0);
        assert_eq!(DEFAULT_READER_CONFIG.sample_count, 5);
        assert_eq!(DEFAULT_READER_CONFIG.sample_delay_ms, 100);
        assert_eq!(DEFAULT_READER_CONFIG.kalman.initial, -60.0);
    }

    #[test]
    fn test_default_config_passes_its_own_validation() {
        assert!(DEFAULT_READER_CONFIG.validate().is_ok());
    }

    #[test]
    fn test_config_wire_format_is_camel_case() {
        let json = serde_json::to_value(DEFAULT_READER_CONFIG).unwrap();
        assert_eq!(json["txPower"], -68);
        assert_eq!(json["pathLossExponent"], 2.5);
        assert_eq!(json["maxDistance"], 5.0);
        assert_eq!(json["sampleCount"], 5);
        assert_eq!(json["sampleDelayMs"], 100);
        assert_eq!(json["kalman"]["P"], 1.0);
        assert_eq!(json["kalman"]["Q"], 0.1);
        assert_eq!(json["kalman"]["R"], 2.0);
        assert_eq!(json["kalman"]["initial"], -60.0);
    }

    #[test]
    fn test_config_deserializes_from_firmware_format() {
        let json = r#"{
            "txPower": -70,
            "pathLossExponent": 2.0,
            "maxDistance": 8.0,
            "sampleCount": 10,
            "sampleDelayMs": 250,
            "kalman": {"P": 1.0, "Q": 0.5, "R": 1.5, "initial": -65.0}
        }"#;
        let config: ReaderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tx_power, -70);
        assert_eq!(config.sample_count, 10);
        assert_eq!(config.kalman.r, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_range_validation() {
        let mut config = DEFAULT_READER_CONFIG;
        config.tx_power = 50;
        assert!(config.validate().is_err());

        let mut config = DEFAULT_READER_CONFIG;
        config.sample_count = 0;
        assert!(config.validate().is_err());

        let mut config = DEFAULT_READER_CONFIG;
        config.kalman.q = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discovery_mode_parse() {
        assert_eq!("pattern".parse::<DiscoveryMode>(), Ok(DiscoveryMode::Pattern));
        assert_eq!(
            "explicit".parse::<DiscoveryMode>(),
            Ok(DiscoveryMode::Explicit)
        );
        assert!("broadcast".parse::<DiscoveryMode>().is_err());
    }

    #[test]
    fn test_discovery_mode_defaults_to_explicit() {
        assert_eq!(DiscoveryMode::default(), DiscoveryMode::Explicit);
    }

    #[test]
    fn test_create_reader_request_defaults() {
        let json = r#"{"name": "READER-01", "location_id": 3}"#;
        let request: CreateReaderRequest = serde_json::from_str(json).unwrap();
        assert!(request.active);
        assert_eq!(request.discovery_mode, DiscoveryMode::Explicit);
        assert!(request.config.is_none());
        assert!(request.tag_ids.is_none());
    }

    #[test]
    fn test_create_reader_request_rejects_bad_config() {
        let json = r#"{
            "name": "READER-01",
            "location_id": 3,
            "config": {
                "txPower": -68, "pathLossExponent": 9.0, "maxDistance": 5.0,
                "sampleCount": 5, "sampleDelayMs": 100,
                "kalman": {"P": 1.0, "Q": 0.1, "R": 2.0, "initial": -60.0}
            }
        }"#;
        let request: CreateReaderRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }
}
