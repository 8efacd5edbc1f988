//! Error types for client operations.

use thiserror::Error;

/// Errors that can occur while talking to the remote store.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, send, read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with something that is not a JSON-RPC
    /// response.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// The endpoint answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// Client misconfiguration (bad auth header, bad page size).
    #[error("configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an invalid response error.
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
