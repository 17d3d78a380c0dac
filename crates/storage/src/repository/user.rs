use sqlx::PgPool;

use crate::dto::user::CreateUserRequest;
use crate::error::Result;
use crate::models::User;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, most recently created first.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, full_name, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Insert one user. The name is whitespace-trimmed before storage.
    pub async fn create(&self, request: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name)
            VALUES ($1)
            RETURNING user_id, full_name, created_at
            "#,
        )
        .bind(request.full_name.trim())
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }
}
