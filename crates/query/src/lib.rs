//! # chainq-query
//!
//! Core engine of the chainq chain-state export tool.
//!
//! This crate contains everything between the command line and the wire:
//! query classification, allow-list filtering, execution against an
//! abstract [`StateStore`] capability, normalization of heterogeneous
//! results into a row-oriented table, and export to JSON and CSV sinks.
//!
//! The remote store itself is a collaborator behind the [`StateStore`]
//! trait; see the `chainq-client` crate for the JSON-RPC implementation.

pub mod diag;
pub mod error;
pub mod executor;
pub mod export;
pub mod filter;
pub mod result;
pub mod spec;
pub mod store;
pub mod table;

// Re-exports
pub use diag::{DiagnosticEvent, Diagnostics, NullDiagnostics, TracingDiagnostics};
pub use error::{QueryError, QueryResult, StoreError};
pub use executor::execute;
pub use filter::FilterSet;
pub use result::RawResult;
pub use spec::{QuerySpec, StorageKind};
pub use store::StateStore;
pub use table::NormalizedTable;
