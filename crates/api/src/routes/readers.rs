//! Reader management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::reader::{CreateReaderRequest, ReaderSummary, UpdateReaderRequest};
use domain::models::Reader;
use persistence::repositories::{LocationRepository, ReaderRepository};

/// List all readers with their location and scan targets.
///
/// GET /api/v1/readers
pub async fn list_readers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReaderSummary>>, ApiError> {
    let repo = ReaderRepository::new(state.pool.clone());
    let location_repo = LocationRepository::new(state.pool.clone());

    let mut summaries = Vec::new();
    for entity in repo.find_all().await? {
        let reader: Reader = entity.into();
        let location_name = match reader.location_id {
            Some(location_id) => location_repo
                .find_by_id(location_id)
                .await?
                .map(|l| l.name),
            None => None,
        };
        let tags = repo
            .tag_infos(reader.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        summaries.push(ReaderSummary {
            id: reader.id,
            name: reader.name,
            active: reader.active,
            discovery_mode: reader.discovery_mode,
            location_name,
            config: reader.config,
            config_fetched_at: reader.config_fetched_at,
            tags,
        });
    }
    Ok(Json(summaries))
}

/// Fetch one reader.
///
/// GET /api/v1/readers/:id
pub async fn get_reader(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reader>, ApiError> {
    let repo = ReaderRepository::new(state.pool.clone());
    let reader = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reader not found".to_string()))?;
    Ok(Json(reader.into()))
}

/// Create a reader, optionally with its explicit scan targets.
///
/// POST /api/v1/readers
pub async fn create_reader(
    State(state): State<AppState>,
    Json(request): Json<CreateReaderRequest>,
) -> Result<(StatusCode, Json<Reader>), ApiError> {
    request.validate()?;
    ensure_location_exists(&state, request.location_id).await?;

    let config_json = request
        .config
        .map(|c| serde_json::to_value(c))
        .transpose()
        .map_err(|e| ApiError::Internal(format!("Failed to serialize config: {e}")))?;

    let repo = ReaderRepository::new(state.pool.clone());
    let entity = repo
        .insert(
            &request.name,
            request.location_id,
            request.active,
            request.discovery_mode.as_str(),
            config_json.as_ref(),
        )
        .await?;

    if let Some(tag_ids) = request.tag_ids {
        repo.sync_tags(entity.id, &tag_ids).await?;
    }

    tracing::info!(reader_id = entity.id, name = %request.name, "Reader created");
    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Update a reader. Also syncs scan targets when `tag_ids` is given and
/// bumps the config version served to the device.
///
/// PUT /api/v1/readers/:id
pub async fn update_reader(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateReaderRequest>,
) -> Result<Json<Reader>, ApiError> {
    request.validate()?;
    ensure_location_exists(&state, request.location_id).await?;

    let repo = ReaderRepository::new(state.pool.clone());
    let previous = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reader not found".to_string()))?;

    let config_json = request
        .config
        .map(|c| serde_json::to_value(c))
        .transpose()
        .map_err(|e| ApiError::Internal(format!("Failed to serialize config: {e}")))?;

    let entity = repo
        .update(
            id,
            &request.name,
            request.location_id,
            request.active,
            request.discovery_mode.as_str(),
            config_json.as_ref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Reader not found".to_string()))?;

    if let Some(tag_ids) = request.tag_ids {
        repo.sync_tags(id, &tag_ids).await?;
    }

    // Drop the stale cache entry under both the old and new names.
    state.directory.invalidate_reader(&previous.name).await;
    state.directory.invalidate_reader(&request.name).await;

    tracing::info!(reader_id = id, name = %request.name, "Reader updated");
    Ok(Json(entity.into()))
}

/// Delete a reader. Tag associations cascade.
///
/// DELETE /api/v1/readers/:id
pub async fn delete_reader(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = ReaderRepository::new(state.pool.clone());
    let reader = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reader not found".to_string()))?;

    repo.delete(id).await?;
    state.directory.invalidate_reader(&reader.name).await;

    tracing::info!(reader_id = id, name = %reader.name, "Reader deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_location_exists(state: &AppState, location_id: i64) -> Result<(), ApiError> {
    LocationRepository::new(state.pool.clone())
        .find_by_id(location_id)
        .await?
        .ok_or_else(|| ApiError::Validation {
            details: serde_json::json!({"location_id": ["Location does not exist"]}),
        })?;
    Ok(())
}
