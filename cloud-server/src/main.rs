//! QC Dashboard Server binary

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qc_dashboard_server::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qc_dashboard_server=debug,qc_signal_core=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    for var in &config.ignored_vars {
        tracing::warn!("Ignoring unparsable {}", var);
    }
    config.validate()?;

    tracing::info!("QC Dashboard Server starting...");
    tracing::info!("Inference backend: {}", config.inference_base_url);
    if let Some(url) = &config.quality_base_url {
        tracing::info!("Quality standards service: {}", url);
    }

    // Build application state
    let state = AppState::new(config.clone()).context("failed to build gateway client")?;

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
