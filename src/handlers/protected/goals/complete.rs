use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// PATCH /api/goals/:id/complete - mark a goal achieved
///
/// There is no way back: goals cannot be un-completed. Completing an already
/// completed goal refreshes `completedAt`.
pub async fn complete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Path(id) = id?;
    let goals = state.goals();

    let Some(goal) = goals.find_owned(id, user.id).await? else {
        tracing::warn!("User {} tried to complete goal {} without owning it", user.id, id);
        return Err(ApiError::forbidden("You do not have permission for this goal"));
    };

    if goal.is_completed {
        tracing::debug!("Goal {} was already completed, re-stamping", id);
    }
    goals.complete(id).await?;

    Ok(ApiResponse::message("Goal completed"))
}
