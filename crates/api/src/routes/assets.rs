//! Asset management endpoints and log history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::asset::{AssetDetail, AssetSummary, CreateAssetRequest, UpdateAssetRequest};
use domain::models::location_log::{
    LogHistoryQuery, LogHistoryResponse, PaginationInfo,
};
use domain::models::Asset;
use persistence::repositories::{AssetRepository, LocationLogRepository};

/// List all assets with tag and location names.
///
/// GET /api/v1/assets
pub async fn list_assets(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssetSummary>>, ApiError> {
    let repo = AssetRepository::new(state.pool.clone());
    let assets = repo
        .find_all_summaries()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(assets))
}

/// Fetch one asset with its most recent log.
///
/// GET /api/v1/assets/:id
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AssetDetail>, ApiError> {
    let repo = AssetRepository::new(state.pool.clone());
    let asset: Asset = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?
        .into();

    let last_log = LocationLogRepository::new(state.pool.clone())
        .latest_for_asset(id)
        .await?
        .map(Into::into);

    Ok(Json(AssetDetail { asset, last_log }))
}

/// Create an asset.
///
/// POST /api/v1/assets
pub async fn create_asset(
    State(state): State<AppState>,
    Json(request): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    request.validate()?;

    let repo = AssetRepository::new(state.pool.clone());
    let asset = repo
        .insert(
            &request.name,
            request.asset_type.as_str(),
            request.location_id,
            request.tag_id,
        )
        .await?;

    state.directory.invalidate_all_assets().await;

    tracing::info!(asset_id = asset.id, name = %asset.name, "Asset created");
    Ok((StatusCode::CREATED, Json(asset.into())))
}

/// Update an asset.
///
/// PUT /api/v1/assets/:id
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAssetRequest>,
) -> Result<Json<Asset>, ApiError> {
    request.validate()?;

    let repo = AssetRepository::new(state.pool.clone());
    let asset = repo
        .update(
            id,
            &request.name,
            request.asset_type.as_str(),
            request.location_id,
            request.tag_id,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?;

    state.directory.invalidate_all_assets().await;

    tracing::info!(asset_id = id, name = %request.name, "Asset updated");
    Ok(Json(asset.into()))
}

/// Delete an asset. Its location logs cascade.
///
/// DELETE /api/v1/assets/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = AssetRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Asset not found".to_string()));
    }

    state.directory.invalidate_all_assets().await;

    tracing::info!(asset_id = id, "Asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Cursor-paginated log history for an asset, newest first.
///
/// GET /api/v1/assets/:id/logs
pub async fn get_asset_logs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<LogHistoryQuery>,
) -> Result<Json<LogHistoryResponse>, ApiError> {
    let asset_repo = AssetRepository::new(state.pool.clone());
    asset_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?;

    let cursor = match &query.cursor {
        Some(cursor) => Some(shared::pagination::decode_cursor(cursor).map_err(|_| {
            ApiError::Validation {
                details: serde_json::json!({"cursor": ["Invalid cursor format"]}),
            }
        })?),
        None => None,
    };

    let limit = query.effective_limit();
    let log_repo = LocationLogRepository::new(state.pool.clone());
    let (entities, has_more) = log_repo.history_page(id, cursor, limit).await?;

    let next_cursor = if has_more {
        entities
            .last()
            .map(|log| shared::pagination::encode_cursor(log.updated_at, log.id))
    } else {
        None
    };

    let logs = entities.into_iter().map(Into::into).collect();

    Ok(Json(LogHistoryResponse {
        logs,
        pagination: PaginationInfo {
            next_cursor,
            has_more,
        },
    }))
}
