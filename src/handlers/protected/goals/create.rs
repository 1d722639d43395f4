use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::handlers::protected::utils::parse_date;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: Option<String>,
    pub date: Option<String>,
}

/// POST /api/goals - add a goal for a day
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateGoalRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Json(payload) = payload?;

    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("Please enter a goal title and date"))?;
    let date = parse_date(payload.date.as_deref())?;

    let goal_id = state.goals().create(user.id, title, date).await?;
    tracing::info!("User {} created goal {}", user.id, goal_id);

    Ok(ApiResponse::success(json!({
        "message": "Goal added",
        "goalId": goal_id
    })))
}
