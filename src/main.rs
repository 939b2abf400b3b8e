use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use inkwell::api::ApiClient;
use inkwell::auth::storage::SqliteStorage;
use inkwell::config::{Cli, Config};
use inkwell::db;
use inkwell::routes;
use inkwell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Remembered sign-ins live in SQLite
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;
    let pruned = SqliteStorage::new(pool.clone()).prune(config.auth.remember_days)?;
    if pruned > 0 {
        tracing::info!(pruned, "Removed expired remembered sessions");
    }

    let api = ApiClient::new(&config.api)?;
    tracing::info!("Inkwell API: {}", api.base_url());

    let state = AppState::new(config.clone(), pool, Arc::new(api));
    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
