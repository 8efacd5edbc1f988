//! # chainq-client
//!
//! HTTP JSON-RPC client for a remote chain-state store, implementing
//! the [`chainq_query::StateStore`] capability the query engine runs
//! against.

mod client;
mod error;
pub mod models;

pub use client::{StateClient, StateClientBuilder, DEFAULT_PAGE_SIZE};
pub use error::{ClientError, ClientResult};
pub use models::{RpcRequest, RpcResponse, RpcResponseError, StoragePage};
