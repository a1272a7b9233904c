//! Tag management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::tag::{CreateTagRequest, TagSummary, UpdateTagRequest};
use domain::models::Tag;
use persistence::repositories::TagRepository;

/// List all tags with the asset each is bound to.
///
/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagSummary>>, ApiError> {
    let repo = TagRepository::new(state.pool.clone());
    let tags = repo
        .find_all_with_asset()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(tags))
}

/// Create a tag.
///
/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    request.validate()?;

    let repo = TagRepository::new(state.pool.clone());
    let tag = repo.insert(&request.name).await?;

    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");
    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// Rename a tag.
///
/// PUT /api/v1/tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, ApiError> {
    request.validate()?;

    let repo = TagRepository::new(state.pool.clone());
    let tag = repo
        .update(id, &request.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    // The device-name-to-asset mapping may have changed with the rename.
    state.directory.invalidate_all_assets().await;

    tracing::info!(tag_id = id, name = %request.name, "Tag updated");
    Ok(Json(tag.into()))
}

/// Delete a tag. Reader associations cascade; an owning asset is left
/// untagged.
///
/// DELETE /api/v1/tags/:id
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = TagRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Tag not found".to_string()));
    }

    state.directory.invalidate_all_assets().await;

    tracing::info!(tag_id = id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}
