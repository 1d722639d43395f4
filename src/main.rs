use anyhow::Context;
use tracing_subscriber::EnvFilter;

use schedule_api::database::manager;
use schedule_api::{app, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DB_* and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("schedule_api=info,tower_http=info")),
        )
        .init();

    // A missing JWT_SECRET stops the process here
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Schedule API in {:?} mode", config.environment);

    let pool = manager::connect(&config.database)
        .await
        .context("database connection failed, check the DB_* settings")?;
    manager::migrate(&pool).await.context("database migration failed")?;

    let port = config.api.port;
    let state = AppState::new(config, pool);
    state
        .uploads
        .ensure_dir()
        .await
        .context("failed to create upload directory")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Schedule API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
