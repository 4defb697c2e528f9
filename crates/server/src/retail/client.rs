//! HTTP client for the Retail v2 REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::instrument;
use url::Url;
use vertex_retail_core::{Placement, SearchRequest, SearchResultReference};

use crate::config::RetailConfig;

use super::RetailApi;
use super::auth::Credentials;
use super::error::RetailError;
use super::types::{Product, SearchResponse};

/// Retail API version prefix.
const API_VERSION: &str = "v2";

/// Header naming the project billed for quota when using user credentials.
const USER_PROJECT_HEADER: &str = "x-goog-user-project";

/// Retail API client.
///
/// Cheap to clone; the HTTP connection pool and credentials are shared.
#[derive(Clone)]
pub struct RetailClient {
    inner: Arc<RetailClientInner>,
}

struct RetailClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl RetailClient {
    /// Create a client from configuration.
    ///
    /// Uses the configured static token if present, otherwise discovers
    /// Application Default Credentials.
    ///
    /// # Errors
    ///
    /// Returns error if no credentials are available or the HTTP client fails to build.
    pub async fn from_config(config: &RetailConfig) -> Result<Self, RetailError> {
        let credentials = match &config.access_token {
            Some(token) => Credentials::Static(token.clone()),
            None => Credentials::application_default().await?,
        };
        Self::new(config, credentials)
    }

    /// Create a client with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RetailConfig, credentials: Credentials) -> Result<Self, RetailError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_PROJECT_HEADER,
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| RetailError::Parse(format!("Invalid project id for header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(RetailClientInner {
                client,
                base_url: config.endpoint.clone(),
                credentials,
            }),
        })
    }

    /// Build the URL for a resource path.
    ///
    /// Each `/`-separated segment is percent-encoded, so ids containing `#`,
    /// `?` or `%` stay inside the path.
    fn url(&self, path: &str) -> Result<Url, RetailError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RetailError::Parse(format!("Invalid Retail endpoint: {}", self.inner.base_url))
            })?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(path.split('/'));
        Ok(url)
    }

    /// Execute a GET request against a resource path.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, RetailError> {
        let url = self.url(path)?;
        let token = self.inner.credentials.bearer_token().await?;
        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request against a resource path.
    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RetailError> {
        let url = self.url(path)?;
        let token = self.inner.credentials.bearer_token().await?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RetailError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| RetailError::Parse(format!("Failed to parse response: {e}")));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(RetailError::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl RetailApi for RetailClient {
    #[instrument(skip(self, placement, request), fields(placement = %placement, query = %request.query))]
    async fn search(
        &self,
        placement: &Placement,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResultReference>, RetailError> {
        tracing::debug!(?request, "Retail search request");

        let path = format!("{placement}:search");
        let response: SearchResponse = self.post(&path, request).await?;

        tracing::debug!(
            results = response.results.len(),
            total_size = response.total_size,
            "Retail search response"
        );

        Ok(response.into_references())
    }

    #[instrument(skip(self))]
    async fn get_product(&self, name: &str) -> Result<Product, RetailError> {
        self.get(name).await
    }
}

impl std::fmt::Debug for RetailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetailClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}
