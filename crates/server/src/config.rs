//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PROJECT_ID` - Google Cloud project that owns the catalog
//! - `CATALOG_ID` - Retail catalog id (usually `default_catalog`)
//!
//! ## Optional
//! - `LOCATION` - Catalog location (default: global)
//! - `SERVING_CONFIG_ID` - Serving config used for search (default: `default_serving_config`)
//! - `RETAIL_API_ENDPOINT` - Retail API base URL (default: <https://retail.googleapis.com>)
//! - `RETAIL_ACCESS_TOKEN` - Static bearer token used instead of Application Default Credentials
//! - `RETAIL_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `MCP_TRANSPORT` - `http` or `stdio` (default: http)
//! - `MCP_HOST` - Bind address for the HTTP transport (default: 0.0.0.0)
//! - `MCP_PORT` - Listen port, falls back to `PORT` set by Cloud Run (default: 8080)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;
use vertex_retail_core::{Placement, PlacementError};

const DEFAULT_LOCATION: &str = "global";
const DEFAULT_SERVING_CONFIG_ID: &str = "default_serving_config";
const DEFAULT_RETAIL_ENDPOINT: &str = "https://retail.googleapis.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8080";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid placement: {0}")]
    Placement(#[from] PlacementError),
}

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Streamable HTTP on `/mcp`.
    #[default]
    Http,
    /// JSON-RPC over stdin/stdout.
    Stdio,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" | "streamable-http" => Ok(Self::Http),
            "stdio" => Ok(Self::Stdio),
            other => Err(format!("expected 'http' or 'stdio', got '{other}'")),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Retail API configuration
    pub retail: RetailConfig,
    /// MCP transport
    pub transport: Transport,
    /// IP address to bind the HTTP transport to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Retail API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct RetailConfig {
    /// Google Cloud project id
    pub project_id: String,
    /// Catalog location
    pub location: String,
    /// Catalog id
    pub catalog_id: String,
    /// Serving config id
    pub serving_config_id: String,
    /// Placement derived from the four ids above
    pub placement: Placement,
    /// Retail API base URL
    pub endpoint: Url,
    /// Static bearer token; `None` means Application Default Credentials
    pub access_token: Option<SecretString>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for RetailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetailConfig")
            .field("placement", &self.placement)
            .field("endpoint", &self.endpoint.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let retail = RetailConfig::from_lookup(env)?;

        let transport = get_env_or_default(env, "MCP_TRANSPORT", "http")
            .parse::<Transport>()
            .map_err(|e| ConfigError::InvalidEnvVar("MCP_TRANSPORT".to_string(), e))?;
        let host = get_env_or_default(env, "MCP_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MCP_HOST".to_string(), e.to_string()))?;
        let port = get_port(env)?;

        let sentry_dsn = get_optional_env(env, "SENTRY_DSN");
        let sentry_environment = get_optional_env(env, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(env, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(env, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            retail,
            transport,
            host,
            port,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the HTTP transport.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RetailConfig {
    fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let project_id = get_required_env(env, "PROJECT_ID")?;
        let location = get_env_or_default(env, "LOCATION", DEFAULT_LOCATION);
        let catalog_id = get_required_env(env, "CATALOG_ID")?;
        let serving_config_id =
            get_env_or_default(env, "SERVING_CONFIG_ID", DEFAULT_SERVING_CONFIG_ID);

        let placement = Placement::new(&project_id, &location, &catalog_id, &serving_config_id)?;

        let endpoint = get_env_or_default(env, "RETAIL_API_ENDPOINT", DEFAULT_RETAIL_ENDPOINT)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("RETAIL_API_ENDPOINT".to_string(), e.to_string())
            })?;
        let access_token = get_optional_env(env, "RETAIL_ACCESS_TOKEN").map(SecretString::from);
        let timeout_secs = get_optional_env(env, "RETAIL_REQUEST_TIMEOUT_SECS")
            .map(|s| match s.parse::<u64>() {
                Ok(0) => Err(ConfigError::InvalidEnvVar(
                    "RETAIL_REQUEST_TIMEOUT_SECS".to_string(),
                    "must be at least 1".to_string(),
                )),
                Ok(secs) => Ok(secs),
                Err(e) => Err(ConfigError::InvalidEnvVar(
                    "RETAIL_REQUEST_TIMEOUT_SECS".to_string(),
                    e.to_string(),
                )),
            })
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            project_id,
            location,
            catalog_id,
            serving_config_id,
            placement,
            endpoint,
            access_token,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable. Empty values count as missing.
fn get_required_env(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    get_optional_env(env, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Get the listen port with fallback to `PORT` (set by Cloud Run).
fn get_port(env: &dyn Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
    let (key, value) = get_optional_env(env, "MCP_PORT")
        .map(|value| ("MCP_PORT", value))
        .or_else(|| get_optional_env(env, "PORT").map(|value| ("PORT", value)))
        .unwrap_or(("MCP_PORT", DEFAULT_PORT.to_string()));

    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
