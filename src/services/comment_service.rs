use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::CommentView;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All comments on a todo, oldest first
    pub async fn list_for_todo(&self, todo_id: i64) -> Result<Vec<CommentView>, DatabaseError> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.content, c.created_at, c.user_id,
                   u.name AS user_name, u.profile_image_url
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.todo_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(todo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Insert a comment and return it joined with its author
    pub async fn create(
        &self,
        todo_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<CommentView, DatabaseError> {
        let comment = sqlx::query_as::<_, CommentView>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (todo_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, content, created_at, user_id
            )
            SELECT i.id, i.content, i.created_at, i.user_id,
                   u.name AS user_name, u.profile_image_url
            FROM inserted i
            JOIN users u ON i.user_id = u.id
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// True when comment `id` exists and was written by `user_id`
    pub async fn is_author(&self, id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self, todo_id: i64) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE todo_id = $1")
            .bind(todo_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
