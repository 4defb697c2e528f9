//! Vertex AI Search for Retail MCP server library.
//!
//! Exposes a single MCP tool, `search_products`, that runs a keyword search
//! against a Retail serving config and returns full product details for each
//! match. The binary in `main.rs` wires this library to a transport; the
//! library form exists so the search flow can be tested against a mock
//! Retail API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod retail;
pub mod state;
pub mod telemetry;
