use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::handlers::protected::utils::parse_date;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// GET /api/todos?date=YYYY-MM-DD - caller's todos for one day, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Query(query) = query?;
    let date = parse_date(query.date.as_deref())?;

    let todos = state.todos().list_for_user_on(user.id, date).await?;

    Ok(ApiResponse::success(json!({ "todos": todos })))
}
