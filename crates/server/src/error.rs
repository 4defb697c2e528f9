//! Startup errors for the MCP server.
//!
//! Runtime failures of the search tool never surface here; they are reported
//! to the caller as tool error records (see [`crate::catalog::CatalogError`]).

use thiserror::Error;

use crate::config::ConfigError;
use crate::retail::RetailError;

/// Errors that stop the server from reaching a ready state.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Retail client could not be created (usually missing credentials).
    #[error("Retail client error: {0}")]
    Retail(#[from] RetailError),

    /// Binding or serving the HTTP listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The MCP service failed to start or stopped abnormally.
    #[error("MCP error: {0}")]
    Mcp(String),
}
