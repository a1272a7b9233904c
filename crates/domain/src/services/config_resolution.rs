//! Effective reader configuration resolution.
//!
//! A reader either carries its own configuration or falls back to the
//! process-wide default constant. The runtime asset-naming pattern is merged
//! in at distribution time so firmware in pattern discovery mode knows what
//! to scan for.

use serde::Serialize;

use crate::models::reader::{Reader, ReaderConfig, DEFAULT_READER_CONFIG};

/// Configuration payload as distributed to a reader.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedConfig {
    #[serde(flatten)]
    pub base: ReaderConfig,
    /// Name prefix scanned for in pattern discovery mode.
    pub asset_name_pattern: String,
}

/// Resolves the effective configuration for a reader.
pub fn resolve_config(reader: &Reader, asset_name_pattern: &str) -> DistributedConfig {
    DistributedConfig {
        base: reader.config.unwrap_or(DEFAULT_READER_CONFIG),
        asset_name_pattern: asset_name_pattern.to_string(),
    }
}

/// Version stamp readers poll against before re-fetching full config.
///
/// The reader row's last-modified time in epoch seconds: any admin edit
/// bumps it.
pub fn config_version(reader: &Reader) -> i64 {
    reader.updated_at.timestamp()
}
