//! Search request and result reference types.

use serde::{Deserialize, Serialize};

use super::filter::FacetFilters;

/// Visitor id used when the caller does not identify the shopper.
pub const DEFAULT_VISITOR_ID: &str = "guest-user";

/// Number of results requested when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: i32 = 5;

/// A single search call against a serving placement.
///
/// Serializes to the Retail `search` request body. The placement is part of
/// the request path, not the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text query. Empty means browse the whole catalog.
    pub query: String,
    /// Shopper identifier used for personalization.
    pub visitor_id: String,
    /// Filter expression; empty means unfiltered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter: String,
    /// Requested page size, passed through as given.
    pub page_size: i32,
}

impl SearchRequest {
    /// Build a request, compiling `filters` into the filter expression.
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        visitor_id: impl Into<String>,
        filters: &FacetFilters,
        page_size: i32,
    ) -> Self {
        Self {
            query: query.into(),
            visitor_id: visitor_id.into(),
            filter: filters.to_expression(),
            page_size,
        }
    }
}

/// Pointer to a matched product, as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResultReference {
    /// Result id (the product id).
    #[serde(default)]
    pub id: String,
    /// Fully-qualified product resource name.
    pub name: String,
}
