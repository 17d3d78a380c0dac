use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::activities::handlers::list_activities,
        features::activities::handlers::create_activity,
        features::leaderboard::handlers::get_leaderboard,
        features::users::handlers::list_users,
        features::users::handlers::create_user,
        features::health_check,
    ),
    components(
        schemas(
            storage::dto::activity::ActivityResponse,
            storage::dto::activity::CreateActivityRequest,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::TimeFrame,
            storage::dto::user::CreateUserRequest,
            storage::dto::user::UserResponse,
            features::HealthResponse,
        )
    ),
    tags(
        (name = "activities", description = "Raw activity feed endpoints"),
        (name = "leaderboard", description = "Ranked leaderboard endpoints"),
        (name = "users", description = "User registration endpoints"),
        (name = "health", description = "Service health endpoints"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Activity Leaderboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(features::api_router())
        .layer(CorsLayer::permissive())
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
