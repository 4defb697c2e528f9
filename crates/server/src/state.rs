//! Application state shared across MCP sessions.

use std::sync::Arc;

use crate::catalog::ProductSearch;
use crate::config::ServerConfig;
use crate::retail::{RetailApi, RetailClient, RetailError};

/// Process-wide state, built once at startup.
///
/// Holds the configuration and the catalog search (placement plus the shared
/// Retail client). Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: ServerConfig,
    search: ProductSearch,
}

impl AppState {
    /// Build state with the HTTP Retail client.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be resolved or the HTTP client fails to build.
    pub async fn new(config: ServerConfig) -> Result<Self, RetailError> {
        let client = RetailClient::from_config(&config.retail).await?;
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// Build state around any Retail API implementation.
    #[must_use]
    pub fn with_api(config: ServerConfig, api: Arc<dyn RetailApi>) -> Self {
        let search = ProductSearch::new(api, config.retail.placement.clone());
        Self {
            inner: Arc::new(AppStateInner { config, search }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn search(&self) -> &ProductSearch {
        &self.inner.search
    }
}
