//! Location log ingestion endpoints.
//!
//! The single-device endpoint is a thin adapter over the batch
//! orchestration with N=1; there is one ingestion path.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::ingest;
use domain::models::location_log::{
    DeviceLogResult, LogAction, RecordLogBatchRequest, RecordLogBatchResponse, RecordLogRequest,
};

/// Single-device success response.
#[derive(Debug, Serialize)]
pub struct RecordLogResponse {
    pub status: &'static str,
    pub log_id: i64,
    pub action: LogAction,
}

/// Single-device warning response (unregistered device).
#[derive(Debug, Serialize)]
pub struct RecordLogWarning {
    pub status: &'static str,
    pub message: &'static str,
}

/// Record one device observation.
///
/// POST /api/v1/reader-log
pub async fn record_log(
    State(state): State<AppState>,
    Json(request): Json<RecordLogRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let reader = state
        .directory
        .authorize_reader(&request.reader_name)
        .await?;
    let results =
        ingest::ingest_batch(&state, &reader, std::slice::from_ref(&request.observation)).await?;

    // The batch was N=1, so exactly one outcome comes back.
    let outcome = results
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("Empty ingestion result".to_string()))?;

    Ok(into_single_response(outcome))
}

/// Record a batch of device observations for one reader.
///
/// POST /api/v1/reader-logs
pub async fn record_logs(
    State(state): State<AppState>,
    Json(request): Json<RecordLogBatchRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    if request.devices.len() > state.config.ingestion.max_batch_size {
        return Err(ApiError::Validation {
            details: serde_json::json!({
                "devices": [format!(
                    "Batch size exceeds the maximum of {}",
                    state.config.ingestion.max_batch_size
                )]
            }),
        });
    }

    let reader = state
        .directory
        .authorize_reader(&request.reader_name)
        .await?;
    let results = ingest::ingest_batch(&state, &reader, &request.devices).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordLogBatchResponse { results }),
    )
        .into_response())
}

fn into_single_response(outcome: DeviceLogResult) -> Response {
    match (outcome.log_id, outcome.action) {
        (Some(log_id), Some(action)) => (
            StatusCode::CREATED,
            Json(RecordLogResponse {
                status: "success",
                log_id,
                action,
            }),
        )
            .into_response(),
        _ => (
            StatusCode::OK,
            Json(RecordLogWarning {
                status: "warning",
                message: outcome.message.unwrap_or("Device not registered"),
            }),
        )
            .into_response(),
    }
}
