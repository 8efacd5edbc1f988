//! Query specification and storage-kind classification.

use crate::error::{QueryError, QueryResult};
use std::path::PathBuf;

/// The four storage shapes a query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// A plain storage item, addressed by (module, item) alone.
    Item,
    /// A collection indexed by one key component.
    Map,
    /// A collection indexed by two key components.
    DoubleMap,
    /// A fixed, non-iterable constant published by a module.
    Const,
}

impl StorageKind {
    /// Maps a requested kind string to a storage kind.
    ///
    /// Unrecognized strings fall back to [`StorageKind::Item`], matching
    /// the tool's historical behavior.
    pub fn classify(kind: &str) -> Self {
        match kind {
            "map" => Self::Map,
            "double" => Self::DoubleMap,
            "const" => Self::Const,
            _ => Self::Item,
        }
    }
}

/// A fully-specified query against the remote chain-state store.
///
/// Constructed once per invocation and immutable thereafter.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// Storage category to query.
    pub module: String,
    /// Storage item (or constant name) within the category.
    pub item: String,
    /// Shape of the storage being queried.
    pub kind: StorageKind,
    /// Primary key; required for double maps, optional for maps.
    pub primary_key: Option<String>,
    /// Secondary key; only meaningful for double maps.
    pub secondary_key: Option<String>,
    /// Path to an allow-list restricting bulk results.
    pub filter_source: Option<PathBuf>,
}

impl QuerySpec {
    /// Builds a normalized query spec.
    ///
    /// Empty key strings and an empty filter path count as absent. For
    /// map queries a filter source takes precedence over a primary
    /// key: the key is cleared so the bulk path runs and the
    /// allow-list decides what survives.
    pub fn new(
        module: impl Into<String>,
        item: impl Into<String>,
        kind: StorageKind,
        primary_key: Option<String>,
        secondary_key: Option<String>,
        filter_source: Option<PathBuf>,
    ) -> Self {
        let filter_source = filter_source.filter(|p| !p.as_os_str().is_empty());
        let mut primary_key = primary_key.filter(|k| !k.is_empty());
        if kind == StorageKind::Map && filter_source.is_some() {
            primary_key = None;
        }
        Self {
            module: module.into(),
            item: item.into(),
            kind,
            primary_key,
            secondary_key: secondary_key.filter(|k| !k.is_empty()),
            filter_source,
        }
    }

    /// Rejects specs that must not reach the remote store.
    ///
    /// A double-map query without a primary key is the one fatal case.
    pub fn validate(&self) -> QueryResult<()> {
        if self.kind == StorageKind::DoubleMap && self.primary_key.is_none() {
            return Err(QueryError::invalid_argument(
                "a double map query requires a primary key",
            ));
        }
        Ok(())
    }
}
