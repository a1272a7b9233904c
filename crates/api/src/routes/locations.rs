//! Location management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::location::{CreateLocationRequest, UpdateLocationRequest};
use domain::models::Location;
use persistence::repositories::LocationRepository;

/// List all locations.
///
/// GET /api/v1/locations
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let locations = repo
        .find_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(locations))
}

/// Fetch one location.
///
/// GET /api/v1/locations/:id
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Location>, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let location = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;
    Ok(Json(location.into()))
}

/// Create a location.
///
/// POST /api/v1/locations
pub async fn create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    request.validate()?;

    let repo = LocationRepository::new(state.pool.clone());
    let location = repo
        .insert(&request.name, request.floor.as_deref())
        .await?;

    tracing::info!(location_id = location.id, name = %location.name, "Location created");
    Ok((StatusCode::CREATED, Json(location.into())))
}

/// Update a location.
///
/// PUT /api/v1/locations/:id
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<Location>, ApiError> {
    request.validate()?;

    let repo = LocationRepository::new(state.pool.clone());
    let location = repo
        .update(id, &request.name, request.floor.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;

    tracing::info!(location_id = id, name = %request.name, "Location updated");
    Ok(Json(location.into()))
}

/// Delete a location. Readers assigned to it and logs attributed to it
/// cascade.
///
/// DELETE /api/v1/locations/:id
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Location not found".to_string()));
    }

    // Cascades may have removed readers; drop any cached copies.
    state.directory.invalidate_all_assets().await;

    tracing::info!(location_id = id, "Location deleted");
    Ok(StatusCode::NO_CONTENT)
}
