// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use celestial_gateway::infrastructure::config::load_gateway_config;
use celestial_gateway::infrastructure::proxy::RequestForwarder;
use celestial_gateway::presentation::app_state::AppState;
use celestial_gateway::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_gateway_config()?;
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .context("invalid server.bind address")?;

    // Create application state
    let state = Arc::new(AppState {
        forwarder: RequestForwarder::new(),
        config,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    println!("Starting celestial-gateway on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
