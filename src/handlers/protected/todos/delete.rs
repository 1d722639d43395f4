use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// DELETE /api/todos/:id - remove a todo, its image file, likes and comments
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(id) = id?;
    let todos = state.todos();

    let Some(todo) = todos.find_owned(id, user.id).await? else {
        tracing::warn!("User {} tried to delete todo {} without owning it", user.id, id);
        return Err(ApiError::forbidden("You do not have permission to delete this todo"));
    };

    if let Some(url) = &todo.image_url {
        state.uploads.remove(url).await?;
    }

    // likes and comments cascade in the database
    todos.delete(id).await?;

    tracing::info!("User {} deleted todo {}", user.id, id);

    Ok(ApiResponse::message("Todo deleted"))
}
