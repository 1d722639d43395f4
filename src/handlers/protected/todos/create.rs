use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension,
};
use serde_json::{json, Value};

use super::TodoForm;
use crate::error::{ApiError, ApiResult};
use crate::handlers::protected::utils::parse_date;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// POST /api/todos - create a todo from a multipart form
///
/// `date` is required, and at least one of `content` or `image` must be
/// present. The image is validated before anything is written.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let form = TodoForm::from_multipart(multipart?).await?;

    let date = parse_date(form.date.as_deref())?;
    let content = form.trimmed_content();
    if content.is_none() && form.image.is_none() {
        return Err(ApiError::validation("Please enter content or attach an image"));
    }

    let image_url = match &form.image {
        Some(image) => Some(state.uploads.save(image).await?),
        None => None,
    };

    let created = state
        .todos()
        .create(user.id, content.as_deref().unwrap_or(""), date, image_url.as_deref())
        .await;

    let todo_id = match created {
        Ok(id) => id,
        Err(e) => {
            // don't leave an orphaned file behind a failed insert
            if let Some(url) = &image_url {
                if let Err(cleanup) = state.uploads.remove(url).await {
                    tracing::warn!("Failed to remove orphaned upload {}: {}", url, cleanup);
                }
            }
            return Err(e.into());
        }
    };

    tracing::info!("User {} created todo {}", user.id, todo_id);

    Ok(ApiResponse::success(json!({
        "message": "Todo added",
        "todoId": todo_id
    })))
}
