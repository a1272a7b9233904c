//! Dashboard summary endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{ObservationStatus, ObservationType};
use persistence::repositories::{AssetRepository, LocationLogRepository, ReaderRepository};

/// Aggregate counters shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_assets: i64,
    pub assets_with_tags: i64,
    pub total_readers: i64,
    /// Readers that reported at least one log in the last hour.
    pub active_readers: i64,
    pub total_logs: i64,
    /// Logs created in the last 24 hours.
    pub recent_logs: i64,
}

/// One row of the recent-logs table.
#[derive(Debug, Serialize)]
pub struct DashboardLog {
    pub id: i64,
    pub asset_id: i64,
    pub asset_name: Option<String>,
    pub location_name: Option<String>,
    #[serde(rename = "type")]
    pub log_type: ObservationType,
    pub status: ObservationStatus,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub reader_name: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub logs: Vec<DashboardLog>,
}

const RECENT_LOG_ROWS: i64 = 50;

/// Dashboard data: counters plus the most recently updated logs.
///
/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let asset_repo = AssetRepository::new(state.pool.clone());
    let reader_repo = ReaderRepository::new(state.pool.clone());
    let log_repo = LocationLogRepository::new(state.pool.clone());

    let now = Utc::now();
    let stats = DashboardStats {
        total_assets: asset_repo.count().await?,
        assets_with_tags: asset_repo.count_tagged().await?,
        total_readers: reader_repo.count().await?,
        active_readers: reader_repo
            .count_reporting_since(now - Duration::hours(1))
            .await?,
        total_logs: log_repo.count().await?,
        recent_logs: log_repo
            .count_created_since(now - Duration::hours(24))
            .await?,
    };

    let logs = log_repo
        .recent_with_names(RECENT_LOG_ROWS)
        .await?
        .into_iter()
        .map(|entity| DashboardLog {
            id: entity.id,
            asset_id: entity.asset_id,
            asset_name: entity.asset_name,
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
            updated_at: entity.updated_at,
        })
        .collect();

    Ok(Json(DashboardResponse { stats, logs }))
}
