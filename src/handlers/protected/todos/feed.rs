use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::database::models::FeedTodo;
use crate::error::ApiResult;
use crate::middleware::{ApiResponse, AuthUser};
use crate::services::FeedPage;
use crate::state::AppState;

/// Raw query values; parsed leniently by [`FeedPage::from_query`]
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub todos: Vec<FeedTodo>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}

/// GET /api/todos/feed?page&limit - other users' todos, newest first
pub async fn feed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<FeedResponse>> {
    let Query(query) = query?;
    let page = FeedPage::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        state.config.api.feed_max_limit,
    );

    let todos = state.todos();
    let total = todos.feed_total(user.id).await?;
    let rows = todos.feed_page(user.id, page).await?;
    let annotated = todos.annotate(user.id, rows).await?;

    Ok(ApiResponse::success(FeedResponse {
        todos: annotated,
        current_page: page.page,
        total_pages: page.total_pages(total),
        total,
    }))
}
