//! Reader configuration distribution endpoint.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::reader::DiscoveryMode;
use domain::services::config_resolution::{self, DistributedConfig};
use persistence::repositories::ReaderRepository;

#[derive(Debug, Deserialize)]
pub struct ReaderConfigQuery {
    pub reader_name: Option<String>,
    #[serde(default)]
    pub version_check: bool,
}

/// Version-check response: enough for a reader to decide whether to
/// re-fetch full config.
#[derive(Debug, Serialize)]
pub struct VersionCheckResponse {
    pub version: i64,
    pub reader_name: String,
    pub last_updated: DateTime<Utc>,
}

/// Full configuration response.
#[derive(Debug, Serialize)]
pub struct ReaderConfigResponse {
    pub name: String,
    pub discovery_mode: DiscoveryMode,
    pub config: DistributedConfig,
    pub version: i64,
    pub last_updated: DateTime<Utc>,
    /// Scan target list; present only in explicit discovery mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
}

/// Serve a reader its effective configuration.
///
/// GET /api/v1/reader-config?reader_name=...&version_check=...
pub async fn get_reader_config(
    State(state): State<AppState>,
    Query(query): Query<ReaderConfigQuery>,
) -> Result<Response, ApiError> {
    let reader_name = query.reader_name.filter(|n| !n.is_empty()).ok_or_else(|| {
        ApiError::Validation {
            details: serde_json::json!({"reader_name": ["reader_name is required"]}),
        }
    })?;

    let reader = state.directory.authorize_reader(&reader_name).await?;
    let version = config_resolution::config_version(&reader);

    if query.version_check {
        return Ok(Json(VersionCheckResponse {
            version,
            reader_name: reader.name,
            last_updated: reader.updated_at,
        })
        .into_response());
    }

    let repo = ReaderRepository::new(state.pool.clone());

    // Last-seen proxy: only full fetches count, cheap version polls don't.
    repo.touch_config_fetched(reader.id).await?;

    let targets = match reader.discovery_mode {
        DiscoveryMode::Explicit => Some(repo.tag_names(reader.id).await?),
        DiscoveryMode::Pattern => None,
    };

    let config = config_resolution::resolve_config(&reader, &state.config.reader.asset_name_pattern);

    tracing::debug!(
        reader_name = %reader.name,
        version,
        discovery_mode = reader.discovery_mode.as_str(),
        "Reader config served"
    );

    Ok(Json(ReaderConfigResponse {
        name: reader.name,
        discovery_mode: reader.discovery_mode,
        config,
        version,
        last_updated: reader.updated_at,
        targets,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::DEFAULT_READER_CONFIG;

    #[test]
    fn test_version_check_response_shape() {
        let response = VersionCheckResponse {
            version: 1747000058,
            reader_name: "READER-01".to_string(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["version"], 1747000058i64);
        assert_eq!(json["reader_name"], "READER-01");
        assert!(json.get("config").is_none());
    }

    #[test]
    fn test_full_response_omits_targets_in_pattern_mode() {
        let response = ReaderConfigResponse {
            name: "READER-01".to_string(),
            discovery_mode: DiscoveryMode::Pattern,
            config: DistributedConfig {
                base: DEFAULT_READER_CONFIG,
                asset_name_pattern: "ASSET-".to_string(),
            },
            version: 1,
            last_updated: Utc::now(),
            targets: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["discovery_mode"], "pattern");
        assert!(json.get("targets").is_none());
        assert_eq!(json["config"]["txPower"], -68);
        assert_eq!(json["config"]["assetNamePattern"], "ASSET-");
    }

    #[test]
    fn test_full_response_includes_targets_in_explicit_mode() {
        let response = ReaderConfigResponse {
            name: "READER-01".to_string(),
            discovery_mode: DiscoveryMode::Explicit,
            config: DistributedConfig {
                base: DEFAULT_READER_CONFIG,
                asset_name_pattern: "ASSET-".to_string(),
            },
            version: 1,
            last_updated: Utc::now(),
            targets: Some(vec!["TAG-0001".to_string(), "TAG-0002".to_string()]),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["targets"][0], "TAG-0001");
        assert_eq!(json["targets"][1], "TAG-0002");
    }
}
