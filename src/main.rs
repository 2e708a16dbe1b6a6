use anyhow::{Context, Result};
use clap::Parser;
use http_log_query::config::AppConfig;
use http_log_query::http::app_server::AppServer;
use http_log_query::logging::init_logging;
use http_log_query::LogStore;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "http-log-query", about = "HTTP access log query server")]
struct Cli {
    /// Path to config file
    #[arg(env = "LOGQUERY_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let now = Instant::now();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    init_logging(&config.logging);

    tracing::info!("Starting http-log-query");

    let store = LogStore::from_config(&config.store).context("Failed to configure log store")?;
    store
        .ensure_table()
        .await
        .context("Failed to prepare log table")?;

    let app = AppServer::new(store);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Server started in {}ms", now.elapsed().as_millis());
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
