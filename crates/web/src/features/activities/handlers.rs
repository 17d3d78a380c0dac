use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        activity::{ActivityResponse, CreateActivityRequest},
        leaderboard::LeaderboardFilter,
    },
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/activity",
    params(LeaderboardFilter),
    responses(
        (status = 200, description = "Every stored activity in insertion order", body = Vec<ActivityResponse>)
    ),
    tag = "activities"
)]
pub async fn list_activities(
    State(db): State<Database>,
    Query(_hints): Query<LeaderboardFilter>,
) -> Result<Response, WebError> {
    // Filter hints are accepted but never applied here; windowing and name
    // matching happen in the leaderboard feature.
    let activities = services::list_activities(db.pool()).await?;

    let response: Vec<ActivityResponse> =
        activities.into_iter().map(ActivityResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/activity",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Activity recorded successfully", body = ActivityResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "activities"
)]
pub async fn create_activity(
    State(db): State<Database>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let activity = services::create_activity(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(ActivityResponse::from(activity))).into_response())
}
