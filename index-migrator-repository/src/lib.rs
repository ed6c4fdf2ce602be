//! # Index Migrator Repository
//!
//! This crate provides the trait and implementations for talking to the
//! search store. It includes definitions for errors, the `SearchStore`
//! connection capability, and a concrete implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use errors::StoreError;
pub use interfaces::SearchStore;
pub use opensearch::OpenSearchStore;
