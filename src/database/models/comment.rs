use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A comment joined with its author's display fields
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub user_name: String,
    pub profile_image_url: Option<String>,
}
