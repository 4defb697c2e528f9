//! MCP (Model Context Protocol) service integration
//!
//! Exposes the `search_products` tool over either transport:
//! - streamable HTTP, nested at `/mcp` in the axum router
//! - stdio, for clients that spawn the server as a subprocess

pub mod tools;

use axum::Router;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};

use crate::error::StartupError;
use crate::state::AppState;
use tools::RetailToolService;

/// Build the MCP router.
///
/// Returns a Router that can be nested at `/mcp` in the main application.
pub fn build_mcp_router(state: &AppState) -> Router {
    // Create factory that produces a service instance for each session
    let state_for_factory = state.clone();
    let factory = move || Ok(RetailToolService::new(state_for_factory.clone()));

    let mcp_service = StreamableHttpService::new(
        factory,
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new().nest_service("/mcp", mcp_service)
}

/// Serve the tool over stdin/stdout until the client disconnects.
///
/// # Errors
///
/// Returns an error if the MCP handshake fails or the service task panics.
pub async fn serve_stdio(state: AppState) -> Result<(), StartupError> {
    let service = RetailToolService::new(state)
        .serve(stdio())
        .await
        .map_err(|e| StartupError::Mcp(e.to_string()))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| StartupError::Mcp(e.to_string()))?;

    tracing::info!(?reason, "MCP stdio session ended");
    Ok(())
}
