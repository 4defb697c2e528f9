//! Vertex AI Search for Retail API client.
//!
//! # API Reference
//!
//! - Base URL: `https://retail.googleapis.com/v2`
//! - Search: `POST /v2/{placement}:search`
//! - Product detail: `GET /v2/{product name}`
//! - Authentication: OAuth bearer token (Application Default Credentials)

mod auth;
mod client;
mod error;
mod types;

pub use auth::Credentials;
pub use client::RetailClient;
pub use error::{ApiError, ApiErrorResponse, RetailError};
pub use types::{Product, SearchResponse, SearchResult};

use async_trait::async_trait;
use vertex_retail_core::{Placement, SearchRequest, SearchResultReference};

/// The two remote calls the catalog search depends on.
#[async_trait]
pub trait RetailApi: Send + Sync {
    /// Run one search against `placement`, returning matches in ranking order.
    async fn search(
        &self,
        placement: &Placement,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResultReference>, RetailError>;

    /// Fetch the full record for a product resource name.
    async fn get_product(&self, name: &str) -> Result<Product, RetailError>;
}
