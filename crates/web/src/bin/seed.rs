use anyhow::Context;
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use storage::{
    Database, dto::activity::CreateActivityRequest, repository::activity::ActivityRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?;

    let db = Database::new(&database_url)
        .await
        .context("Failed to initialize database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    let repo = ActivityRepository::new(db.pool());

    let removed = repo.delete_all().await?;
    tracing::info!("Cleared {} existing activities", removed);

    let fixtures = build_fixtures(Local::now())?;
    for request in &fixtures {
        repo.create(request).await?;
    }

    tracing::info!(
        "Seeded {} activities covering the daily, monthly, and yearly windows",
        fixtures.len()
    );

    Ok(())
}

/// Demo data relative to `now`: activities today, in the previous calendar
/// month, and spread across the current year.
fn build_fixtures(now: DateTime<Local>) -> anyhow::Result<Vec<CreateActivityRequest>> {
    let mut fixtures = Vec::new();

    for _ in 0..5 {
        fixtures.push(activity("Alex Benjamin", now.with_timezone(&Utc), 20));
    }

    let (year, month) = previous_month(now.year(), now.month());
    for day in [2, 5, 10] {
        fixtures.push(activity("Joe Hendry", local_midnight(year, month, day)?, 30));
    }

    for month in [1, 2, 3] {
        fixtures.push(activity(
            "Samoa Joe",
            local_midnight(now.year(), month, 15)?,
            40,
        ));
    }

    Ok(fixtures)
}

fn activity(user_name: &str, activity_time: DateTime<Utc>, points: i64) -> CreateActivityRequest {
    CreateActivityRequest {
        user_name: user_name.to_string(),
        activity_time: Some(activity_time),
        points,
    }
}

fn local_midnight(year: i32, month: u32, day: u32) -> anyhow::Result<DateTime<Utc>> {
    Local
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("Invalid local date {year:04}-{month:02}-{day:02}"))
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}
