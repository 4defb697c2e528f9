//! Core types for the Retail search adapter.
//!
//! This module provides the value types shared by the MCP server and its tests.

pub mod error_record;
pub mod filter;
pub mod placement;
pub mod product;
pub mod search;

pub use error_record::{ErrorRecord, INVALID_ARGUMENT_MESSAGE, SEARCH_FAILED_MESSAGE};
pub use filter::{Facet, FacetFilters};
pub use placement::{Placement, PlacementError};
pub use product::ProductMapping;
pub use search::{DEFAULT_PAGE_SIZE, DEFAULT_VISITOR_ID, SearchRequest, SearchResultReference};
