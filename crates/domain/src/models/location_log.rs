//! Asset location log model and the reader-facing ingestion payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Observation kind reported by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationType {
    Heartbeat,
    Alert,
}

impl ObservationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heartbeat => "heartbeat",
            Self::Alert => "alert",
        }
    }
}

impl FromStr for ObservationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heartbeat" => Ok(Self::Heartbeat),
            "alert" => Ok(Self::Alert),
            other => Err(format!("unknown observation type: {other}")),
        }
    }
}

/// Detection status of the tag at the reporting reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationStatus {
    Present,
    NotFound,
    OutOfRange,
}

impl ObservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::NotFound => "not_found",
            Self::OutOfRange => "out_of_range",
        }
    }
}

impl FromStr for ObservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "not_found" => Ok(Self::NotFound),
            "out_of_range" => Ok(Self::OutOfRange),
            other => Err(format!("unknown observation status: {other}")),
        }
    }
}

/// One observation record.
///
/// Within the rolling window at most one live row exists per
/// (asset, location, status, type) tuple; steady-state heartbeats amend that
/// row in place instead of appending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetLocationLog {
    pub id: i64,
    pub asset_id: i64,
    pub location_id: i64,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    #[serde(rename = "type")]
    pub log_type: ObservationType,
    pub status: ObservationStatus,
    pub reader_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One device observation as sent by a reader.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeviceObservation {
    #[validate(length(min = 1, max = 255, message = "Device name must be between 1 and 255 characters"))]
    pub device_name: String,

    #[serde(rename = "type")]
    pub observation_type: ObservationType,

    pub status: ObservationStatus,

    pub rssi: Option<f64>,

    pub kalman_rssi: Option<f64>,

    /// -1 means "not found", per the firmware contract.
    #[validate(custom(function = "shared::validation::validate_estimated_distance"))]
    pub estimated_distance: Option<f64>,
}

/// Body of POST /reader-log.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordLogRequest {
    #[validate(length(min = 1, max = 255, message = "Reader name must be between 1 and 255 characters"))]
    pub reader_name: String,

    #[serde(flatten)]
    #[validate(nested)]
    pub observation: DeviceObservation,
}

/// Body of POST /reader-logs.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordLogBatchRequest {
    #[validate(length(min = 1, max = 255, message = "Reader name must be between 1 and 255 characters"))]
    pub reader_name: String,

    #[validate(length(min = 1, message = "At least one device observation is required"))]
    #[validate(nested)]
    pub devices: Vec<DeviceObservation>,
}

/// What happened to the log row for a processed observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Created,
    Updated,
}

/// Per-device outcome in a batch response.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceLogResult {
    pub device_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<LogAction>,
}

impl DeviceLogResult {
    /// Outcome for a device with no registered asset. Not an error: the
    /// device may simply not be enrolled yet.
    pub fn unregistered(device_name: String) -> Self {
        Self {
            device_name,
            status: "warning",
            message: Some("Device not registered"),
            log_id: None,
            action: None,
        }
    }

    pub fn recorded(device_name: String, log_id: i64, action: LogAction) -> Self {
        Self {
            device_name,
            status: "success",
            message: None,
            log_id: Some(log_id),
            action: Some(action),
        }
    }
}

/// Body of the batch ingestion response.
#[derive(Debug, Clone, Serialize)]
pub struct RecordLogBatchResponse {
    pub results: Vec<DeviceLogResult>,
}

/// Log history item with the location name joined in.
#[derive(Debug, Clone, Serialize)]
pub struct LogHistoryItem {
    pub id: i64,
    pub location_name: Option<String>,
    #[serde(rename = "type")]
    pub log_type: ObservationType,
    pub status: ObservationStatus,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub reader_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cursor-paginated log history response.
#[derive(Debug, Clone, Serialize)]
pub struct LogHistoryResponse {
    pub logs: Vec<LogHistoryItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationInfo {
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Query parameters for the log history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LogHistoryQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

impl LogHistoryQuery {
    const DEFAULT_LIMIT: i64 = 50;
    const MAX_LIMIT: i64 = 200;

    /// Requested limit clamped to [1, 200].
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_log_request_flat_wire_shape() {
        let json = r#"{
            "reader_name": "READER-01",
            "device_name": "ASSET-0042",
            "type": "heartbeat",
            "status": "present",
            "rssi": -61.5,
            "kalman_rssi": -60.2,
            "estimated_distance": 1.8
        }"#;
        let request: RecordLogRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.reader_name, "READER-01");
        assert_eq!(request.observation.device_name, "ASSET-0042");
        assert_eq!(
            request.observation.observation_type,
            ObservationType::Heartbeat
        );
        assert_eq!(request.observation.status, ObservationStatus::Present);
        assert_eq!(request.observation.rssi, Some(-61.5));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_metrics_are_optional() {
        let json = r#"{
            "reader_name": "READER-01",
            "device_name": "ASSET-0042",
            "type": "alert",
            "status": "not_found"
        }"#;
        let request: RecordLogRequest = serde_json::from_str(json).unwrap();
        assert!(request.observation.rssi.is_none());
        assert!(request.observation.kalman_rssi.is_none());
        assert!(request.observation.estimated_distance.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_one_distance_accepted() {
        let json = r#"{
            "reader_name": "READER-01",
            "device_name": "ASSET-0042",
            "type": "alert",
            "status": "not_found",
            "estimated_distance": -1
        }"#;
        let request: RecordLogRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());

        let json = json.replace("-1", "-2");
        let request: RecordLogRequest = serde_json::from_str(&json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unknown_type_rejected_at_deserialization() {
        let json = r#"{
            "reader_name": "READER-01",
            "device_name": "ASSET-0042",
            "type": "ping",
            "status": "present"
        }"#;
        assert!(serde_json::from_str::<RecordLogRequest>(json).is_err());
    }

    #[test]
    fn test_batch_request_requires_devices() {
        let json = r#"{"reader_name": "READER-01", "devices": []}"#;
        let request: RecordLogBatchRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_device_result_shapes() {
        let warning = DeviceLogResult::unregistered("ASSET-0001".to_string());
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["message"], "Device not registered");
        assert!(json.get("log_id").is_none());
        assert!(json.get("action").is_none());

        let success = DeviceLogResult::recorded("ASSET-0002".to_string(), 99, LogAction::Created);
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["log_id"], 99);
        assert_eq!(json["action"], "created");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_history_query_limit_clamping() {
        let query = LogHistoryQuery {
            cursor: None,
            limit: None,
        };
        assert_eq!(query.effective_limit(), 50);

        let query = LogHistoryQuery {
            cursor: None,
            limit: Some(1000),
        };
        assert_eq!(query.effective_limit(), 200);

        let query = LogHistoryQuery {
            cursor: None,
            limit: Some(0),
        };
        assert_eq!(query.effective_limit(), 1);
    }
}
