//! Vertex AI Search for Retail MCP server.
//!
//! Serves the `search_products` tool over streamable HTTP (default, at
//! `/mcp`) or stdio, selected by `MCP_TRANSPORT`.
//!
//! # Configuration
//!
//! - `PROJECT_ID`, `CATALOG_ID` (required)
//! - `LOCATION`, `SERVING_CONFIG_ID` (optional, default `global` / `default_serving_config`)
//! - `MCP_HOST`, `MCP_PORT` / `PORT`
//!
//! Credentials come from Application Default Credentials.

#![cfg_attr(not(test), forbid(unsafe_code))]

use vertex_retail_mcp::config::{ServerConfig, Transport};
use vertex_retail_mcp::error::StartupError;
use vertex_retail_mcp::state::AppState;
use vertex_retail_mcp::{http, mcp, telemetry};

#[tokio::main]
async fn main() {
    // Load .env first so RUST_LOG from it reaches the subscriber
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    // Keep the guard alive for the lifetime of the server
    let _sentry_guard = telemetry::init_sentry(&config);

    tracing::info!(
        placement = %config.retail.placement,
        transport = ?config.transport,
        "Starting Vertex AI Search for Retail MCP server"
    );

    let state = AppState::new(config).await?;

    match state.config().transport {
        Transport::Http => http::serve(state).await,
        Transport::Stdio => mcp::serve_stdio(state).await,
    }
}
