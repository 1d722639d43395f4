use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Raw `todos` row, used for ownership checks and file cleanup
#[derive(Debug, Clone, FromRow)]
pub struct StoredTodo {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A todo joined with its author's name
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TodoView {
    pub id: i64,
    pub content: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Feed row: a todo plus live like/comment aggregates for the viewer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTodo {
    #[serde(flatten)]
    pub todo: TodoView,
    pub like_count: i64,
    pub is_liked: bool,
    pub comment_count: i64,
}
