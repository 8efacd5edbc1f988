//! Allow-list loading for bulk map queries.

use crate::diag::{DiagnosticEvent, Diagnostics};
use crate::error::{QueryError, QueryResult};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Field name looked up in structured filter records.
pub const ADDRESS_FIELD: &str = "Address";

/// An immutable set of keys restricting which entries of a bulk query
/// are retained.
///
/// An empty set is a real filter that suppresses every row; "no filter
/// at all" is represented by not constructing a `FilterSet` in the
/// first place (`Option<FilterSet>` at the call site).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    keys: HashSet<String>,
}

impl FilterSet {
    /// Whether `key` is a member of the allow-list.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of keys in the allow-list.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the allow-list holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<String> for FilterSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Loads an allow-list from `path`.
///
/// The file is first parsed as a JSON array of records each carrying an
/// `"Address"` field. If it is not valid JSON it is read as
/// newline-delimited text instead: one key per line, trimmed, empty
/// lines skipped. An unopenable file is fatal.
pub fn load(path: &Path, diag: &dyn Diagnostics) -> QueryResult<FilterSet> {
    let text = fs::read_to_string(path)
        .map_err(|source| QueryError::resource_unavailable(path, source))?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(records)) => {
            let mut keys = HashSet::with_capacity(records.len());
            for record in &records {
                let address = record
                    .get(ADDRESS_FIELD)
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        QueryError::invalid_argument(format!(
                            "filter record in {} has no string `{ADDRESS_FIELD}` field",
                            path.display()
                        ))
                    })?;
                keys.insert(address.to_string());
            }
            Ok(FilterSet { keys })
        }
        Ok(_) => Err(QueryError::invalid_argument(format!(
            "filter file {} is not a JSON array of records",
            path.display()
        ))),
        Err(_) => {
            diag.record(DiagnosticEvent::FilterJsonFallback { path });
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect())
        }
    }
}
