use sqlx::PgPool;
use storage::{
    dto::activity::CreateActivityRequest, error::Result, models::Activity,
    repository::activity::ActivityRepository,
};

/// List every recorded activity in insertion order
pub async fn list_activities(pool: &PgPool) -> Result<Vec<Activity>> {
    let repo = ActivityRepository::new(pool);
    repo.list().await
}

/// Record a new activity
pub async fn create_activity(pool: &PgPool, request: &CreateActivityRequest) -> Result<Activity> {
    let repo = ActivityRepository::new(pool);
    repo.create(request).await
}
