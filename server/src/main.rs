//! VK Relay - Main Entry Point
//!
//! Receives VK community callbacks and forwards new wall posts to Telegram.

use anyhow::Result;
use std::net::SocketAddr;
use tracing::{info, warn};

use vk_relay::{api, config, telegram::TelegramGateway};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vk_relay=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration; any missing variable stops the process here
    dotenvy::dotenv().ok();
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        group_id = config.vk_group_id,
        "Starting VK relay"
    );

    let http = reqwest::Client::new();

    // Authorize the bot once so a bad token shows up in the startup logs
    let gateway = TelegramGateway::new(http.clone(), &config.telegram)?;
    match gateway.get_me().await {
        Ok(username) => info!(username = %username, "Telegram bot authorized"),
        Err(e) => warn!(error = %e, "Telegram bot authorization failed"),
    }

    // Build application state and router
    let state = api::AppState::new(config.clone(), http);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("Server shutdown complete");

    Ok(())
}
