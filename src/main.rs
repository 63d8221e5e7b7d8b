use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use medklinika_api::auth::TokenService;
use medklinika_api::config;
use medklinika_api::database::postgres::PostgresStore;
use medklinika_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting MedKlinika API in {:?} mode", config.environment);

    // Missing signing secret or database URL is fatal at startup
    let tokens = TokenService::new(
        &config.security.jwt_secret,
        config.security.jwt_expiry_hours,
    )
    .context("JWT_SECRET must be set")?;

    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;
    let store = Arc::new(
        PostgresStore::connect(
            url,
            config.database.max_connections,
            Duration::from_secs(config.database.connection_timeout_secs),
        )
        .await
        .context("failed to connect to database")?,
    );

    let state = AppState::new(store.clone(), store.clone(), store, tokens);
    let app = medklinika_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("MedKlinika API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
