//! QPortfolio - portfolio optimization backend
//! Proxies the quantum optimizer, or serves synthesized analytics in mock mode.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qportfolio_backend::{
    api::{self, AppState},
    config::{AppConfig, Cli},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = AppConfig::from(Cli::parse());
    info!(
        mode = config.mode(),
        upstream = config.quantum_base_url.as_deref().unwrap_or("-"),
        request_timeout_ms = config.request_timeout.as_millis() as u64,
        "QPortfolio backend starting"
    );
    if !config.mock_mode && config.quantum_base_url.is_none() {
        warn!("QUANTUM_BASE_URL not set: optimize and rebalance will fail until it is configured or MOCK_MODE is on");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;
    let app = api::router(state)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qportfolio_backend=debug,qportfolio=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate's own .env when launched from elsewhere
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
