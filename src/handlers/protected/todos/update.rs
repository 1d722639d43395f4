use axum::{
    extract::{multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, State},
    Extension,
};
use serde_json::Value;

use super::TodoForm;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// PATCH /api/todos/:id - edit content and/or replace the image
///
/// An absent `content` field keeps the stored text. A new image replaces the
/// old one, whose file is deleted once the row points at the new path.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(id) = id?;

    let Some(existing) = state.todos().find_owned(id, user.id).await? else {
        tracing::warn!("User {} tried to edit todo {} without owning it", user.id, id);
        return Err(ApiError::forbidden("You do not have permission to edit this todo"));
    };

    let form = TodoForm::from_multipart(multipart?).await?;

    let content = match &form.content {
        Some(_) => form.trimmed_content().unwrap_or_default(),
        None => existing.content.clone(),
    };
    if content.is_empty() && form.image.is_none() && existing.image_url.is_none() {
        return Err(ApiError::validation("Please enter content or attach an image"));
    }

    let image_url = match &form.image {
        Some(image) => Some(state.uploads.save(image).await?),
        None => existing.image_url.clone(),
    };

    if let Err(e) = state.todos().update(id, &content, image_url.as_deref()).await {
        if form.image.is_some() {
            if let Some(url) = &image_url {
                if let Err(cleanup) = state.uploads.remove(url).await {
                    tracing::warn!("Failed to remove orphaned upload {}: {}", url, cleanup);
                }
            }
        }
        return Err(e.into());
    }

    if form.image.is_some() {
        if let Some(old) = &existing.image_url {
            // The row already points at the new file
            if let Err(e) = state.uploads.remove(old).await {
                tracing::warn!("Failed to remove replaced upload {}: {}", old, e);
            }
        }
    }

    tracing::info!("User {} updated todo {}", user.id, id);

    Ok(ApiResponse::message("Todo updated"))
}
