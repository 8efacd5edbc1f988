//! Raw query results as delivered by the remote store.

use serde_json::Value;

/// The result of one query, before normalization.
///
/// Map entries preserve the delivery order of the remote iteration; no
/// re-sorting happens anywhere in the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// A single value. A recovered remote failure on a scalar path
    /// yields `Scalar(Value::Null)`.
    Scalar(Value),
    /// An ordered sequence of `(key, value)` pairs from a bulk
    /// iteration. A recovered remote failure on a bulk path yields an
    /// empty map.
    Map(Vec<(String, Value)>),
}

impl RawResult {
    /// Full-fidelity JSON rendering, used by the structured dump.
    ///
    /// Map entries become an object in delivery order (serde_json is
    /// built with `preserve_order`, so the order survives).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
        }
    }
}
