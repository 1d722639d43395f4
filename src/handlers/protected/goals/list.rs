use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::handlers::protected::todos::list::DateQuery;
use crate::handlers::protected::utils::parse_date;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// GET /api/goals?date=YYYY-MM-DD - caller's goals for one day
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Query(query) = query?;
    let date = parse_date(query.date.as_deref())?;

    let goals = state.goals().list_for_user_on(user.id, date).await?;

    Ok(ApiResponse::success(json!({ "goals": goals })))
}
