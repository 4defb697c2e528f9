//! Vertex Retail Core - Shared types library.
//!
//! This crate provides the types used across the Retail search adapter:
//! - `server` - MCP server exposing the `search_products` tool
//! - `integration-tests` - End-to-end tests against a mocked Retail API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Building a
//! placement, compiling facet filters and shaping output records are all pure
//! functions and live here.
//!
//! # Modules
//!
//! - [`types`] - Placement, search request, facet filters, product and error records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
