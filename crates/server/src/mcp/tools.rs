//! MCP tool service implementation
//!
//! Provides `RetailToolService`, which implements the rmcp `ServerHandler`
//! trait with the single `search_products` tool.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vertex_retail_core::{DEFAULT_PAGE_SIZE, DEFAULT_VISITOR_ID, FacetFilters, SearchRequest};

use crate::state::AppState;

const SERVER_NAME: &str = "Vertex AI Search for Retail API";
const SERVER_INSTRUCTIONS: &str =
    "A MCP server that searches a product catalog using Vertex AI Search for Retail. \
     Call search_products with a keyword and optional brand, color family, category \
     or size filters; each result is one product with id, title, price and uri.";

fn default_visitor_id() -> String {
    DEFAULT_VISITOR_ID.to_string()
}

const fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

/// Request parameters for the `search_products` tool
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchProductsRequest {
    /// The product keyword to search for
    #[schemars(
        description = "The product keyword to search for (e.g., 'jeans', 'sneakers'). An empty string browses the whole catalog."
    )]
    pub query: String,

    /// Shopper identifier used for personalized results
    #[serde(default = "default_visitor_id")]
    #[schemars(description = "A unique ID to identify the user, used for personalized results.")]
    pub visitor_id: String,

    #[serde(default)]
    #[schemars(description = "Only return products of this brand (e.g., 'Levi's').")]
    pub brand: Option<String>,

    #[serde(default)]
    #[schemars(description = "Only return products in this color family (e.g., 'Blue').")]
    pub color_families: Option<String>,

    #[serde(default)]
    #[schemars(description = "Only return products in this category (e.g., 'Apparel > Pants').")]
    pub category: Option<String>,

    #[serde(default)]
    #[schemars(description = "Only return products available in this size (e.g., 'M', '32').")]
    pub size: Option<String>,

    #[serde(default = "default_page_size")]
    #[schemars(description = "Maximum number of products to return.")]
    pub page_size: i32,
}

impl SearchProductsRequest {
    /// Build the Retail search request for these parameters.
    #[must_use]
    pub fn to_search_request(&self) -> SearchRequest {
        let filters = FacetFilters {
            brand: self.brand.clone(),
            color_families: self.color_families.clone(),
            category: self.category.clone(),
            size: self.size.clone(),
        };
        SearchRequest::new(&self.query, &self.visitor_id, &filters, self.page_size)
    }
}

/// MCP tool service for Retail product search
#[derive(Clone)]
pub struct RetailToolService {
    state: AppState,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RetailToolService {
    /// Create a new service with access to server state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Search the product catalog and return full details for each match
    #[tool(
        description = "Searches the product catalog for a given query and returns the detailed information for each product found. Optional brand, color_families, category and size narrow the results to exact matches."
    )]
    async fn search_products(
        &self,
        Parameters(req): Parameters<SearchProductsRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_search(&req).await
    }
}

impl RetailToolService {
    /// Run a search and shape the tool result.
    ///
    /// Success yields one JSON content item per product, in ranking order.
    /// Failure yields a single `{"error", "details"}` item flagged as a tool error.
    ///
    /// # Errors
    ///
    /// Returns `ErrorData` only if a record cannot be serialized.
    pub async fn run_search(
        &self,
        req: &SearchProductsRequest,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = std::time::Instant::now();

        tracing::info!(
            query = %req.query,
            visitor_id = %req.visitor_id,
            page_size = req.page_size,
            "MCP search_products tool invoked"
        );

        match self.state.search().search(req.to_search_request()).await {
            Ok(products) => {
                tracing::info!(
                    products = products.len(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "MCP search_products succeeded"
                );

                let content = products
                    .into_iter()
                    .map(Content::json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CallToolResult::success(content))
            }
            Err(e) => {
                let record = e.to_record();
                tracing::warn!(
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis(),
                    "MCP search_products failed"
                );

                // Return error as tool error content
                Ok(CallToolResult::error(vec![Content::json(record)?]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for RetailToolService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some(SERVER_NAME.to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}
