//! Main Entrypoint for the Turing Hunt API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the AI agent for the configured provider.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use turing_api::{
    config::{Config, Provider},
    router::create_router,
    state::AppState,
};
use turing_core::agent::{AiAgent, CannedAgent, LlmAgent};
use turing_core::prompts::PromptBook;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

fn build_agent(config: &Config) -> anyhow::Result<Arc<dyn AiAgent>> {
    let Some(api_base) = config.provider.api_base() else {
        info!("Using canned AI lines; no model calls will be made.");
        return Ok(Arc::new(CannedAgent));
    };
    let api_key = config
        .api_key()
        .context("No API key configured for the selected provider")?;
    let prompts = PromptBook::load(&config.prompts_path).context("Failed to load prompts")?;
    let agent = LlmAgent::new(api_key, api_base, config.chat_model.clone(), prompts)
        .with_length_caps(config.rules.question_max_len, config.rules.answer_max_len);
    Ok(Arc::new(agent))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let agent = build_agent(&config)?;
    let app_state = AppState::new(config.clone(), agent);

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state.clone()).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    app_state.sessions.shutdown_all().await;
    info!("Server has shut down.");
    Ok(())
}
