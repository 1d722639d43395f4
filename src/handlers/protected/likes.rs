// handlers/protected/likes.rs - like toggle and status
//
// POST /api/todos/:id/like    toggle
// GET  /api/todos/:id/likes   status

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::middleware::{ApiResponse, AuthUser};
use crate::services::LikeStatus;
use crate::state::AppState;

/// POST /api/todos/:id/like - like if not yet liked, otherwise unlike
///
/// Keyed by the caller, not by ownership of the todo. Liking a todo that
/// does not exist is rejected with 403.
pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(todo_id) = todo_id?;

    let liked = state.likes().toggle(todo_id, user.id).await?;
    let message = if liked { "Like added" } else { "Like removed" };

    Ok(ApiResponse::success(json!({
        "liked": liked,
        "message": message
    })))
}

/// GET /api/todos/:id/likes - like count and whether the caller liked it
pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<LikeStatus>> {
    let Path(todo_id) = todo_id?;

    let status = state.likes().status(todo_id, user.id).await?;

    Ok(ApiResponse::success(status))
}
