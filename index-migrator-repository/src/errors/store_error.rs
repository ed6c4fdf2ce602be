//! Search store error types.
//!
//! This module defines the error types that can occur while talking to the
//! remote search store.

use thiserror::Error;

/// Errors that can occur during search store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Failed to establish a connection to the search store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request could not be sent (network, transport, serialization).
    #[error("Request error: {0}")]
    RequestError(String),

    /// The store answered with a non-success status.
    #[error("Store responded with status {status}: {body}")]
    ResponseError { status: u16, body: String },

    /// Failed to parse a response from the search store.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create a response error from a status code and response body.
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::ResponseError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
