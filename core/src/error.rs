//! Error types for the todo API client and store.
//!
//! # Design
//! `ApiError` describes why a single round trip failed. The store collapses
//! every `ApiError` into one user-facing kind, a rejection carrying a message,
//! so callers only ever see `StoreError`.

use thiserror::Error;

use crate::store::Operation;

/// Errors produced while building, executing, or parsing a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Outcome of a failed store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The round trip failed. `message` is what the store records as `error`
    /// for operations that surface failures.
    #[error("{message}")]
    Rejected { operation: Operation, message: String },

    /// The operation requires a local item that does not exist.
    #[error("no todo with id {0} in the store")]
    UnknownItem(u64),
}

impl StoreError {
    /// Convert a round-trip failure into the rejection recorded for `operation`.
    ///
    /// Non-2xx responses get the operation's fixed message; every other failure
    /// keeps the underlying error text.
    pub fn rejected(operation: Operation, err: &ApiError) -> Self {
        let message = match err {
            ApiError::HttpError { .. } => operation.server_error_message().to_string(),
            other => other.to_string(),
        };
        StoreError::Rejected { operation, message }
    }
}

/// Errors from reading configuration out of the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("page size must be at least 1")]
    ZeroPageSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_failures_use_the_operation_message() {
        let err = ApiError::HttpError {
            status: 500,
            body: "boom".to_string(),
        };
        let rejection = StoreError::rejected(Operation::ToggleCompletion, &err);
        assert_eq!(rejection.to_string(), "Can't toggle status. Server error.");
    }

    #[test]
    fn transport_failures_keep_their_text() {
        let err = ApiError::Transport("connection refused".to_string());
        let rejection = StoreError::rejected(Operation::FetchList, &err);
        assert_eq!(rejection.to_string(), "transport failed: connection refused");
    }
}
