//! Normalization of raw results into a row-oriented table.

use crate::result::RawResult;
use serde_json::Value;

/// Header name of the key column.
pub const KEY_COLUMN: &str = "key";
/// Header name of the generic value column.
pub const VALUE_COLUMN: &str = "value";

/// A uniform tabular view of a [`RawResult`].
///
/// Every row holds exactly `header.len()` cells; rows appear in the
/// delivery order of the underlying result.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// Ordered column names.
    pub header: Vec<String>,
    /// Ordered rows, aligned to `header`.
    pub rows: Vec<Vec<Value>>,
}

impl NormalizedTable {
    /// Builds the table for `result` in one pass.
    ///
    /// - A scalar becomes a single row under a generic `value` header;
    ///   `Scalar(null)` (a recovered remote failure) yields zero rows.
    /// - A map of scalars becomes `key,value` rows.
    /// - A map of records takes its header from the first record-valued
    ///   entry. Later rows align to that header **by field name**, so a
    ///   record whose fields arrive in a different order still lines
    ///   up; a missing field yields an empty cell. Rows are padded or
    ///   truncated to the header width, never shifted.
    pub fn from_result(result: &RawResult) -> Self {
        match result {
            RawResult::Scalar(Value::Null) => Self {
                header: vec![VALUE_COLUMN.to_string()],
                rows: Vec::new(),
            },
            RawResult::Scalar(value) => Self {
                header: vec![VALUE_COLUMN.to_string()],
                rows: vec![vec![value.clone()]],
            },
            RawResult::Map(entries) => {
                let header = record_header(entries);
                let rows = entries
                    .iter()
                    .map(|(key, value)| {
                        let mut row = Vec::with_capacity(header.len());
                        row.push(Value::String(key.clone()));
                        match value.as_object() {
                            Some(record) => {
                                for field in &header[1..] {
                                    row.push(record.get(field).cloned().unwrap_or(Value::Null));
                                }
                            }
                            None => row.push(value.clone()),
                        }
                        row.resize(header.len(), Value::Null);
                        row
                    })
                    .collect();
                Self { header, rows }
            }
        }
    }
}

/// Header for a map result: `key` plus the fields of the first
/// record-valued entry, or `key,value` when no entry is a record.
fn record_header(entries: &[(String, Value)]) -> Vec<String> {
    entries
        .iter()
        .find_map(|(_, value)| value.as_object())
        .map(|record| {
            std::iter::once(KEY_COLUMN.to_string())
                .chain(record.keys().cloned())
                .collect()
        })
        .unwrap_or_else(|| vec![KEY_COLUMN.to_string(), VALUE_COLUMN.to_string()])
}
