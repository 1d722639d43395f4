use chrono::NaiveDate;
use futures::future::try_join_all;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{FeedTodo, StoredTodo, TodoView};
use crate::services::{CommentService, LikeService};

pub const DEFAULT_FEED_PAGE: i64 = 1;
pub const DEFAULT_FEED_LIMIT: i64 = 10;

const TODO_VIEW_SELECT: &str = r#"
    SELECT t.id, t.content, t.date, t.image_url, t.user_id,
           u.name AS user_name, t.created_at
    FROM todos t
    JOIN users u ON t.user_id = u.id
"#;

/// Page window for the feed.
///
/// Missing, non-numeric and non-positive values fall back to the defaults;
/// `limit` is clamped to `max_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPage {
    pub page: i64,
    pub limit: i64,
}

impl FeedPage {
    pub fn from_query(page: Option<&str>, limit: Option<&str>, max_limit: i64) -> Self {
        let positive = |raw: Option<&str>, default: i64| {
            raw.and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            page: positive(page, DEFAULT_FEED_PAGE),
            limit: positive(limit, DEFAULT_FEED_LIMIT).min(max_limit.max(1)),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// ceil(total / limit)
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

pub struct TodoService {
    pool: PgPool,
}

impl TodoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The user's own todos for one day, newest first
    pub async fn list_for_user_on(&self, user_id: i64, date: NaiveDate) -> Result<Vec<TodoView>, DatabaseError> {
        let sql = format!(
            "{TODO_VIEW_SELECT} WHERE t.user_id = $1 AND t.date = $2 ORDER BY t.created_at DESC, t.id DESC"
        );
        let todos = sqlx::query_as::<_, TodoView>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        Ok(todos)
    }

    pub async fn create(
        &self,
        user_id: i64,
        content: &str,
        date: NaiveDate,
        image_url: Option<&str>,
    ) -> Result<i64, DatabaseError> {
        let id: (i64,) = sqlx::query_as(
            "INSERT INTO todos (user_id, content, date, image_url) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user_id)
        .bind(content)
        .bind(date)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.0)
    }

    /// Todo `id` if it belongs to `user_id`
    pub async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<StoredTodo>, DatabaseError> {
        let todo = sqlx::query_as::<_, StoredTodo>(
            r#"
            SELECT id, user_id, content, date, image_url, created_at
            FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    pub async fn update(&self, id: i64, content: &str, image_url: Option<&str>) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE todos SET content = $1, image_url = $2 WHERE id = $3")
            .bind(content)
            .bind(image_url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete the row; likes and comments go with it through ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Number of todos written by anyone except `viewer_id`
    pub async fn feed_total(&self, viewer_id: i64) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos WHERE user_id <> $1")
            .bind(viewer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// One page of other users' todos, newest first
    pub async fn feed_page(&self, viewer_id: i64, page: FeedPage) -> Result<Vec<TodoView>, DatabaseError> {
        let sql = format!(
            "{TODO_VIEW_SELECT} WHERE t.user_id <> $1 ORDER BY t.created_at DESC, t.id DESC LIMIT $2 OFFSET $3"
        );
        let todos = sqlx::query_as::<_, TodoView>(&sql)
            .bind(viewer_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(todos)
    }

    /// Attach like/comment aggregates to each row.
    ///
    /// Rows are annotated concurrently; within a row the like count, the
    /// viewer's like and the comment count are fetched in sequence.
    pub async fn annotate(&self, viewer_id: i64, todos: Vec<TodoView>) -> Result<Vec<FeedTodo>, DatabaseError> {
        let likes = LikeService::new(self.pool.clone());
        let comments = CommentService::new(self.pool.clone());

        try_join_all(todos.into_iter().map(|todo| {
            let likes = &likes;
            let comments = &comments;
            async move {
                let status = likes.status(todo.id, viewer_id).await?;
                let comment_count = comments.count(todo.id).await?;
                Ok::<_, DatabaseError>(FeedTodo {
                    todo,
                    like_count: status.like_count,
                    is_liked: status.is_liked,
                    comment_count,
                })
            }
        }))
        .await
    }
}
