//! Error types for the query engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving and exporting a query.
///
/// Remote-call failures on item/map lookups are recovered inside the
/// executor and never surface here; the variants below are the fatal
/// ones that abort an invocation.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed or insufficient query spec.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// The remote endpoint could not serve a required call.
    #[error("remote unavailable in {call}: {message}")]
    RemoteUnavailable {
        /// Call signature that was attempted.
        call: String,
        /// Error message.
        message: String,
    },

    /// A constant lookup came back empty. Constants are required to
    /// exist, so this is fatal.
    #[error("constant {module}::{name} does not exist")]
    ConstantNotFound {
        /// Storage category.
        module: String,
        /// Constant name.
        name: String,
    },

    /// A local file (filter allow-list, output sink) could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    ResourceUnavailable {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error on an already-open sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a remote unavailable error carrying the attempted call.
    pub fn remote_unavailable<C: Into<String>, S: Into<String>>(call: C, message: S) -> Self {
        Self::RemoteUnavailable {
            call: call.into(),
            message: message.into(),
        }
    }

    /// Create a resource unavailable error.
    pub fn resource_unavailable<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::ResourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result type for query engine operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Errors reported by the remote chain-state collaborator.
///
/// Only constant lookups distinguish `NotFound`; a null storage value
/// is an ordinary value, not an error.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested constant does not exist.
    #[error("{module}::{name} not found")]
    NotFound {
        /// Storage category.
        module: String,
        /// Constant name.
        name: String,
    },

    /// The endpoint is unreachable or the call failed transiently.
    #[error("{0}")]
    Unavailable(String),
}
