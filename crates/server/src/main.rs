use anyhow::Context;
use db::DBService;
use server::{AppState, config::ServerConfig, routes};
use tokio::net::TcpListener;
use tracing::info;
use utils::logging::init_tracing;

const DEFAULT_LOG_DIRECTIVES: &str = "server=info,db=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(DEFAULT_LOG_DIRECTIVES);

    let config = ServerConfig::from_env()?;
    let db = DBService::new(&config.database_url)
        .await
        .context("failed to open task store")?;

    let app = routes::router(AppState::new(db));
    let listener = TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.socket_addr()))?;

    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
