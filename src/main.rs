use dotenvy::dotenv;
use shop_ease::{api, config, errors::Result};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the application settings
    let settings = config::settings::load()
        .inspect_err(|e| error!("Failed to load application settings: {}", e))?;
    let bind_addr = settings.server.bind_addr.clone();

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema is up to date."))
        .inspect_err(|e| error!("Failed to create database schema: {}", e))?;

    // 5. Serve the API
    let state = api::AppState::new(db, Arc::new(settings));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
