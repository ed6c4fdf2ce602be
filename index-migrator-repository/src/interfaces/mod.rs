//! Interface definitions for the search store connection.
//!
//! This module defines the abstract `SearchStore` trait that allows for
//! dependency injection and swappable store implementations.

mod search_store;

pub use search_store::SearchStore;
