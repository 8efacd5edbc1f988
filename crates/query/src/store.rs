//! The remote chain-state capability.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// Read access to a remote chain-state store.
///
/// The executor only ever talks to the store through this trait, so
/// tests can substitute an in-memory implementation and the transport
/// stays out of the core engine.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Resolves a single storage value by category, item and key
    /// arguments. An empty `keys` slice addresses a plain item.
    async fn query(&self, module: &str, item: &str, keys: &[String])
        -> Result<Value, StoreError>;

    /// Iterates all `(key, value)` pairs of a keyed collection, in the
    /// order the remote delivers them. `keys` holds the fixed leading
    /// key components (the primary key when walking one arm of a
    /// double map).
    async fn query_map(
        &self,
        module: &str,
        item: &str,
        keys: &[String],
    ) -> Result<Vec<(String, Value)>, StoreError>;

    /// Resolves a named constant published by a category.
    ///
    /// Constants are required to exist; implementations report an
    /// absent constant as [`StoreError::NotFound`].
    async fn get_constant(&self, module: &str, name: &str) -> Result<Value, StoreError>;
}
