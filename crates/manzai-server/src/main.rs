//! Manzai Server - HTTP API for rendering two-voice manzai scripts

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod settings;
mod state;

use manzai_core::VoicevoxClient;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "manzai_server=debug,manzai_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Manzai Server");

    let config = settings::load()?;
    info!("Synthesis engine: {}", config.engine.base_url);
    info!("Scripts directory: {:?}", config.storage.script_dir);

    let client = VoicevoxClient::new(&config.engine)?;
    match client.version().await {
        Ok(version) => info!("Connected to synthesis engine (version {})", version),
        Err(e) => warn!("Synthesis engine is not responding: {}", e),
    }

    let state = AppState::new(Arc::new(client), &config);
    let app = api::create_router(state, &config.server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
