use sqlx::PgPool;

use crate::dto::activity::CreateActivityRequest;
use crate::error::Result;
use crate::models::Activity;

pub struct ActivityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every stored activity in insertion order.
    pub async fn list(&self) -> Result<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT activity_id, user_name, activity_time, points, created_at
            FROM activities
            ORDER BY created_at, activity_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(activities)
    }

    /// Insert one activity record. Omitted fields take their schema defaults.
    pub async fn create(&self, request: &CreateActivityRequest) -> Result<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (user_name, activity_time, points)
            VALUES ($1, COALESCE($2, now()), $3)
            RETURNING activity_id, user_name, activity_time, points, created_at
            "#,
        )
        .bind(&request.user_name)
        .bind(request.activity_time)
        .bind(request.points)
        .fetch_one(self.pool)
        .await?;

        Ok(activity)
    }

    /// Remove every stored activity. Used by the seed tool before reloading
    /// fixtures.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM activities")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
