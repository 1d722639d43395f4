// handlers/protected/comments.rs - comment handlers
//
// GET    /api/todos/:id/comments   list
// POST   /api/todos/:id/comments   create - {content}
// DELETE /api/comments/:id             delete

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
}

/// GET /api/todos/:id/comments - oldest first, with author name and avatar
pub async fn list(
    State(state): State<AppState>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(todo_id) = todo_id?;

    let comments = state.comments().list_for_todo(todo_id).await?;

    Ok(ApiResponse::success(json!({ "comments": comments })))
}

/// POST /api/todos/:id/comments - add a comment, returns it with author info
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    todo_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(todo_id) = todo_id?;
    let Json(payload) = payload?;

    let content = payload
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("Please enter a comment"))?;

    let comment = state.comments().create(todo_id, user.id, content).await?;
    tracing::debug!("User {} commented {} on todo {}", user.id, comment.id, todo_id);

    Ok(ApiResponse::success(json!({
        "message": "Comment added",
        "comment": comment
    })))
}

/// DELETE /api/comments/:id - only the comment's author may delete it
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(id) = id?;
    let comments = state.comments();

    if !comments.is_author(id, user.id).await? {
        tracing::warn!("User {} tried to delete comment {} without authoring it", user.id, id);
        return Err(ApiError::forbidden("You do not have permission to delete this comment"));
    }

    comments.delete(id).await?;

    Ok(ApiResponse::message("Comment deleted"))
}
