use sqlx::PgPool;
use storage::{
    dto::user::CreateUserRequest, error::Result, models::User, repository::user::UserRepository,
};

/// List all registered users
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    let repo = UserRepository::new(pool);
    repo.list().await
}

/// Register a new user
pub async fn create_user(pool: &PgPool, request: &CreateUserRequest) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.create(request).await
}
