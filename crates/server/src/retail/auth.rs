//! Bearer token sources for the Retail API.

use std::sync::Arc;

use gcp_auth::TokenProvider;
use secrecy::{ExposeSecret, SecretString};

use super::error::RetailError;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where request access tokens come from.
#[derive(Clone)]
pub enum Credentials {
    /// Application Default Credentials (metadata server, gcloud user, service account key).
    ApplicationDefault(Arc<dyn TokenProvider>),
    /// A fixed token, e.g. for local runs against an emulator.
    Static(SecretString),
}

impl Credentials {
    /// Discover Application Default Credentials.
    ///
    /// # Errors
    ///
    /// Returns `RetailError::Auth` if no credential source is available.
    pub async fn application_default() -> Result<Self, RetailError> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| RetailError::Auth(e.to_string()))?;
        Ok(Self::ApplicationDefault(provider))
    }

    /// Get a bearer token for the next request.
    ///
    /// `gcp_auth` caches tokens internally and refreshes them before expiry.
    ///
    /// # Errors
    ///
    /// Returns `RetailError::Auth` if the token cannot be fetched.
    pub async fn bearer_token(&self) -> Result<String, RetailError> {
        match self {
            Self::ApplicationDefault(provider) => {
                let token = provider
                    .token(&[CLOUD_PLATFORM_SCOPE])
                    .await
                    .map_err(|e| RetailError::Auth(e.to_string()))?;
                Ok(token.as_str().to_string())
            }
            Self::Static(token) => Ok(token.expose_secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApplicationDefault(_) => f.write_str("Credentials::ApplicationDefault"),
            Self::Static(_) => f.write_str("Credentials::Static([REDACTED])"),
        }
    }
}
