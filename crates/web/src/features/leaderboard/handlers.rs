use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::Local;
use storage::{
    Database,
    dto::leaderboard::{LeaderboardEntry, LeaderboardFilter},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardFilter),
    responses(
        (status = 200, description = "Ranked leaderboard for the selected window", body = Vec<LeaderboardEntry>)
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Query(filter): Query<LeaderboardFilter>,
) -> Result<Response, WebError> {
    // The only wall-clock read; the ranking itself is a pure function of
    // the records, the filter, and this instant.
    let entries = services::get_leaderboard(db.pool(), &filter, Local::now()).await?;

    Ok(Json(entries).into_response())
}
