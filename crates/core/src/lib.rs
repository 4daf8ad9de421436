//! Routine Advisor Core - Shared types library.
//!
//! This crate provides the types shared by the advisor server and its tests:
//! - `advisor` - Catalog picker and routine advisor web app
//! - `integration-tests` - End-to-end tests against a stub proxy
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and chat roles
//! - [`catalog`] - Products, the catalog and category filtering
//! - [`selection`] - The shopper's selection set

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod selection;
pub mod types;

pub use catalog::{Catalog, CatalogDocument, CatalogError, CatalogParseError, Product};
pub use selection::SelectionSet;
pub use types::*;
