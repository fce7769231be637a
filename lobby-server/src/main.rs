//! SimLobby Server
//!
//! Hosts the lobby session behind a REST and SSE API

use anyhow::Result;
use clap::Parser;
use sim_lobby_server::{api, config::LobbyConfig, state};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = LobbyConfig::parse();
    info!("Starting SimLobby Server");

    // Create application state
    let state = state::AppState::from_config(&config)?;

    // Build the router
    let app = api::create_router(state.clone());

    info!("Server listening on http://{}", config.listen);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop any tick task still attached to the session
    state.lobby.end_session().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
