pub mod activities;
pub mod leaderboard;
pub mod users;

use axum::{Json, Router, routing::get};
use serde::Serialize;
use storage::Database;
use utoipa::ToSchema;

/// Readiness probe response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Every feature router plus the health probe, ready for `with_state`.
pub fn api_router() -> Router<Database> {
    Router::new()
        .nest("/api/activity", activities::routes::routes())
        .nest("/api/leaderboard", leaderboard::routes::routes())
        .nest("/api/users", users::routes::routes())
        .route("/health", get(health_check))
}
