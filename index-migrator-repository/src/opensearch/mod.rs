//! OpenSearch implementation of the search store connection.
//!
//! This module provides a concrete implementation of `SearchStore`
//! using the OpenSearch Rust client.

mod response;
mod store;

pub use store::OpenSearchStore;
