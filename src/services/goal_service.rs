use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Goal;

const GOAL_COLUMNS: &str = "id, user_id, title, date, is_completed, completed_at";

pub struct GoalService {
    pool: PgPool,
}

impl GoalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The user's goals for one day, in creation order
    pub async fn list_for_user_on(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Goal>, DatabaseError> {
        let sql = format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 AND date = $2 ORDER BY created_at ASC, id ASC"
        );
        let goals = sqlx::query_as::<_, Goal>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        Ok(goals)
    }

    pub async fn create(&self, user_id: i64, title: &str, date: NaiveDate) -> Result<i64, DatabaseError> {
        let id: (i64,) = sqlx::query_as(
            "INSERT INTO goals (user_id, title, date) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(title)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.0)
    }

    /// Goal `id` if it belongs to `user_id`
    pub async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Goal>, DatabaseError> {
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2");
        let goal = sqlx::query_as::<_, Goal>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(goal)
    }

    /// Mark the goal completed and stamp `completed_at`.
    ///
    /// Calling it again on a completed goal re-stamps the timestamp.
    pub async fn complete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE goals SET is_completed = TRUE, completed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
