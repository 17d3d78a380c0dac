use chrono::{DateTime, TimeZone};
use sqlx::PgPool;
use storage::{
    dto::leaderboard::{LeaderboardEntry, LeaderboardFilter},
    error::Result,
    services::leaderboard,
};

/// Rank all stored activities for the given filter at the given instant
pub async fn get_leaderboard<Tz: TimeZone>(
    pool: &PgPool,
    filter: &LeaderboardFilter,
    now: DateTime<Tz>,
) -> Result<Vec<LeaderboardEntry>> {
    let entries = leaderboard::compute_leaderboard(pool, filter, now).await?;

    tracing::debug!(
        "Leaderboard computed: {} entries (time_frame={}, user_name={:?})",
        entries.len(),
        filter.time_frame.as_str(),
        filter.user_name
    );

    Ok(entries)
}
