use serde::Serialize;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: i64,
    pub is_liked: bool,
}

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flip the caller's like on a todo and return whether it is now liked.
    ///
    /// Not transactional: two concurrent toggles from the same user can race,
    /// in which case the losing insert fails on the (todo_id, user_id) unique
    /// constraint with [`DatabaseError::UniqueViolation`].
    pub async fn toggle(&self, todo_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        if self.has_liked(todo_id, user_id).await? {
            sqlx::query("DELETE FROM likes WHERE todo_id = $1 AND user_id = $2")
                .bind(todo_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(false)
        } else {
            sqlx::query("INSERT INTO likes (todo_id, user_id) VALUES ($1, $2)")
                .bind(todo_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(true)
        }
    }

    pub async fn count(&self, todo_id: i64) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE todo_id = $1")
            .bind(todo_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn has_liked(&self, todo_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM likes WHERE todo_id = $1 AND user_id = $2")
                .bind(todo_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 > 0)
    }

    /// Count then membership, one after the other
    pub async fn status(&self, todo_id: i64, user_id: i64) -> Result<LikeStatus, DatabaseError> {
        let like_count = self.count(todo_id).await?;
        let is_liked = self.has_liked(todo_id, user_id).await?;
        Ok(LikeStatus { like_count, is_liked })
    }
}
