//! Error types for the search store connection.

mod store_error;

pub use store_error::StoreError;
