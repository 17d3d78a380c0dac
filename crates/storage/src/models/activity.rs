use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Activity {
    pub activity_id: Uuid,
    pub user_name: String,
    pub activity_time: DateTime<Utc>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}
