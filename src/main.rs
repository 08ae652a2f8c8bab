use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdm::app::{create_app, has_frontend};
use pdm::config::CONFIG;
use pdm::services::{FileRepository, FileService, LockManager};
use pdm::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before the config is first read
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pdm={},tower_http=debug", CONFIG.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting {} v{}", CONFIG.name, CONFIG.version);

    let repository = FileRepository::new(&CONFIG.repo_path)?;
    tracing::info!("Repository at {}", repository.repo_path().display());

    let locks = LockManager::new(&CONFIG.locks_file)?;
    tracing::info!("Lock file at {}", locks.locks_file().display());

    if !has_frontend(&CONFIG.static_files_dir) {
        tracing::warn!(
            "No index.html in {}; only the API will be served",
            CONFIG.static_files_dir.display()
        );
    }

    // Create app state
    let state = AppState::new(FileService::new(repository, locks));

    // Build the application
    let app = create_app(state, &CONFIG);

    let addr = CONFIG.bind_addr();
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
