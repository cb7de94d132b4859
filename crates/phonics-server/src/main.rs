// Phonics Explorer HTTP server

use anyhow::{Context, Result};
use phonics_server::{build_app, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before tracing so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phonics_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::info!("Loaded .env from {:?}", path);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "phonics-server starting...");

    let config = AppConfig::from_env();
    tracing::info!(
        oauth = config.auth.oauth_enabled(),
        production = config.auth.production,
        frontend = %config.frontend_dist_dir.display(),
        "Authentication configured"
    );

    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
