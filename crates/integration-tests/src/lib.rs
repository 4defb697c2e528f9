//! Integration tests for the Vertex AI Search for Retail MCP server.
//!
//! Tests drive the `search_products` tool end to end against a `wiremock`
//! stand-in for the Retail REST API, so no Google credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vertex-retail-integration-tests
//! ```

use serde::Serialize;
use serde_json::Value;
use vertex_retail_mcp::config::ServerConfig;
use vertex_retail_mcp::mcp::tools::RetailToolService;
use vertex_retail_mcp::state::AppState;
use wiremock::MockServer;

pub const PROJECT_ID: &str = "test-project";
pub const CATALOG_ID: &str = "test-catalog";
pub const ACCESS_TOKEN: &str = "test-token";

/// Path of the search call for the default test placement.
pub const SEARCH_PATH: &str = "/v2/projects/test-project/locations/global/catalogs/test-catalog/servingConfigs/default_serving_config:search";

/// Server configuration pointed at a mock Retail endpoint with a static token.
///
/// # Panics
///
/// Panics if the configuration is rejected.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config(endpoint: &str) -> ServerConfig {
    let endpoint = endpoint.to_owned();
    ServerConfig::from_lookup(&move |key| match key {
        "PROJECT_ID" => Some(PROJECT_ID.to_owned()),
        "CATALOG_ID" => Some(CATALOG_ID.to_owned()),
        "RETAIL_API_ENDPOINT" => Some(endpoint.clone()),
        "RETAIL_ACCESS_TOKEN" => Some(ACCESS_TOKEN.to_owned()),
        _ => None,
    })
    .unwrap()
}

/// Tool service backed by the real HTTP Retail client and `server`.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[allow(clippy::unwrap_used)]
pub async fn tool_service(server: &MockServer) -> RetailToolService {
    let state = AppState::new(test_config(&server.uri())).await.unwrap();
    RetailToolService::new(state)
}

/// A full product resource name under the test catalog.
#[must_use]
pub fn product_name(id: &str) -> String {
    format!("projects/{PROJECT_ID}/locations/global/catalogs/{CATALOG_ID}/branches/0/products/{id}")
}

/// Split a tool result into its error flag and the JSON of each content item.
///
/// # Panics
///
/// Panics if the result does not have the MCP `CallToolResult` shape.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn tool_records(result: &impl Serialize) -> (bool, Vec<Value>) {
    let result = serde_json::to_value(result).unwrap();
    let is_error = result["isError"].as_bool().unwrap_or(false);
    let records = result["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| serde_json::from_str(item["text"].as_str().unwrap()).unwrap())
        .collect();
    (is_error, records)
}
