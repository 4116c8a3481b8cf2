use anyhow::Result;
use chrono::Duration;
use jsonplaceholder_api::api::routes::create_routes;
use jsonplaceholder_api::config::seeding::DatabaseSeeder;
use jsonplaceholder_api::config::{AppConfig, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Populate an empty store from the remote source. Seeding failures are
    // logged and must not prevent the server from starting.
    let seeder = DatabaseSeeder::new(pool.clone(), config.seed_url.clone());
    if let Err(e) = seeder.seed().await {
        error!(error = %e, "Database seeding failed");
    }

    let app = create_routes(
        pool,
        &config.jwt_secret,
        Duration::minutes(config.token_ttl_minutes),
    );

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("JSONPlaceholder API starting on http://{}", config.server_address());
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
