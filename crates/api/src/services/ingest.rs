//! Batch ingestion orchestration.
//!
//! One authorized reader, an ordered list of device observations, one
//! transaction. Per device: resolve the asset, run the compaction decision
//! against the live log row (locked `FOR UPDATE`), persist, and apply the
//! presence side effect. An unregistered device yields a warning outcome
//! and never aborts its siblings; any storage error rolls the whole batch
//! back.

use chrono::{Duration, Utc};
use tracing::{debug, error, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics;
use domain::models::location_log::{DeviceLogResult, DeviceObservation, LogAction};
use domain::models::{ObservationStatus, ObservationType, Reader};
use domain::services::change_detection::{
    self, IncomingObservation, LogDecision, PriorObservation, LOG_WINDOW_SECS,
};
use persistence::repositories::location_log::NewLocationLog;
use persistence::repositories::{AssetRepository, LocationLogRepository};

/// Processes a batch of observations for an authorized reader.
///
/// The reader must already have passed authorization; this fails with
/// `ReaderNotConfigured` if it has no assigned location to attribute
/// observations to.
pub async fn ingest_batch(
    state: &AppState,
    reader: &Reader,
    devices: &[DeviceObservation],
) -> Result<Vec<DeviceLogResult>, ApiError> {
    let location_id = reader.location_id.ok_or_else(|| {
        warn!(reader_name = %reader.name, "Reader has no location assigned");
        ApiError::ReaderNotConfigured
    })?;

    let mut tx = state.pool.begin().await.map_err(|e| storage_error(e, reader, None))?;
    let mut results = Vec::with_capacity(devices.len());

    for observation in devices {
        // Unregistered devices are an expected steady-state condition, not
        // an error; skip persistence but keep processing siblings.
        let asset = state
            .directory
            .resolve_asset(&observation.device_name)
            .await
            .map_err(|e| storage_error(e, reader, Some(&observation.device_name)))?;
        let Some(asset) = asset else {
            warn!(
                device_name = %observation.device_name,
                reader_name = %reader.name,
                "Device not registered"
            );
            metrics::record_unregistered_device();
            results.push(DeviceLogResult::unregistered(
                observation.device_name.clone(),
            ));
            continue;
        };

        let now = Utc::now();
        let cutoff = now - Duration::seconds(LOG_WINDOW_SECS);
        let prior = LocationLogRepository::find_recent_for_update(
            &mut *tx,
            asset.id,
            location_id,
            observation.status.as_str(),
            observation.observation_type.as_str(),
            cutoff,
        )
        .await
        .map_err(|e| storage_error(e, reader, Some(&observation.device_name)))?;

        let incoming = IncomingObservation {
            rssi: observation.rssi,
            kalman_rssi: observation.kalman_rssi,
            estimated_distance: observation.estimated_distance,
            reader_name: reader.name.clone(),
        };
        let decision = change_detection::decide(
            prior
                .as_ref()
                .map(|p| PriorObservation {
                    rssi: p.rssi,
                    kalman_rssi: p.kalman_rssi,
                    estimated_distance: p.estimated_distance,
                    reader_name: p.reader_name.clone(),
                    updated_at: p.updated_at,
                })
                .as_ref(),
            &incoming,
            now,
        );

        let (log, action) = match (decision, prior) {
            (LogDecision::Amend, Some(prior)) => {
                let log = LocationLogRepository::amend(
                    &mut *tx,
                    prior.id,
                    observation.rssi,
                    observation.kalman_rssi,
                    observation.estimated_distance,
                )
                .await
                .map_err(|e| storage_error(e, reader, Some(&observation.device_name)))?;
                (log, LogAction::Updated)
            }
            (decision, _) => {
                if let LogDecision::DrasticChange(reason) = decision {
                    warn!(
                        drastic_change = true,
                        reason = reason.as_str(),
                        asset_id = asset.id,
                        asset_name = %asset.name,
                        location_id,
                        reader_name = %reader.name,
                        "Drastic change detected, starting new log row"
                    );
                    metrics::record_drastic_change(reason.as_str());
                }
                let log = LocationLogRepository::insert(
                    &mut *tx,
                    NewLocationLog {
                        asset_id: asset.id,
                        location_id,
                        rssi: observation.rssi,
                        kalman_rssi: observation.kalman_rssi,
                        estimated_distance: observation.estimated_distance,
                        log_type: observation.observation_type.as_str(),
                        status: observation.status.as_str(),
                        reader_name: &reader.name,
                    },
                )
                .await
                .map_err(|e| storage_error(e, reader, Some(&observation.device_name)))?;
                (log, LogAction::Created)
            }
        };

        // Presence always asserts "last known good location", independent
        // of whether the log row was created or amended.
        if observation.status == ObservationStatus::Present
            && asset.location_id != Some(location_id)
        {
            AssetRepository::set_current_location(&mut *tx, asset.id, location_id)
                .await
                .map_err(|e| storage_error(e, reader, Some(&observation.device_name)))?;
            state
                .directory
                .invalidate_asset(&observation.device_name)
                .await;
            tracing::info!(
                asset_id = asset.id,
                asset_name = %asset.name,
                location_id,
                reader_name = %reader.name,
                "Asset location updated"
            );
        }

        match observation.observation_type {
            ObservationType::Alert => {
                warn!(
                    asset_id = asset.id,
                    asset_name = %asset.name,
                    status = observation.status.as_str(),
                    location_id,
                    distance = observation.estimated_distance,
                    reader_name = %reader.name,
                    rssi = observation.rssi,
                    kalman_rssi = observation.kalman_rssi,
                    "Asset alert"
                );
            }
            ObservationType::Heartbeat => {
                debug!(
                    asset_id = asset.id,
                    asset_name = %asset.name,
                    location_id,
                    distance = observation.estimated_distance,
                    reader_name = %reader.name,
                    "Asset heartbeat"
                );
            }
        }

        metrics::record_observation(match action {
            LogAction::Created => "created",
            LogAction::Updated => "updated",
        });
        results.push(DeviceLogResult::recorded(
            observation.device_name.clone(),
            log.id,
            action,
        ));
    }

    tx.commit()
        .await
        .map_err(|e| storage_error(e, reader, None))?;

    Ok(results)
}

/// Logs a storage failure with its context and converts it to the generic
/// ingestion error. The transaction rolls back when dropped, so no partial
/// batch is ever committed.
fn storage_error(err: sqlx::Error, reader: &Reader, device_name: Option<&str>) -> ApiError {
    error!(
        error = %err,
        reader_name = %reader.name,
        device_name = device_name.unwrap_or("-"),
        "Failed to record location log"
    );
    ApiError::RecordFailed
}
