//! Query execution strategies.
//!
//! One strategy per [`StorageKind`], all funneled through [`execute`].
//! Transport failures on item and map lookups are recovered into
//! absent/empty results after the attempted call is reported to the
//! diagnostics sink; constant lookups are the exception and stay
//! fatal, because downstream callers rely on constants existing.

use crate::diag::{DiagnosticEvent, Diagnostics};
use crate::error::{QueryError, QueryResult, StoreError};
use crate::filter;
use crate::result::RawResult;
use crate::spec::{QuerySpec, StorageKind};
use crate::store::StateStore;
use serde_json::Value;

/// Runs `spec` against `store` and returns the raw result.
///
/// Fatal errors (`InvalidArgument`, `ConstantNotFound`,
/// `ResourceUnavailable`, and a failed constant transport) propagate;
/// everything else degrades to an absent or empty result.
pub async fn execute(
    store: &dyn StateStore,
    spec: &QuerySpec,
    diag: &dyn Diagnostics,
) -> QueryResult<RawResult> {
    match spec.kind {
        StorageKind::Item => scalar_query(store, spec, Vec::new(), diag).await,
        StorageKind::Const => constant_query(store, spec).await,
        StorageKind::Map => {
            // A filter source forces the bulk path, even when a primary
            // key survived in a hand-built spec.
            if spec.filter_source.is_none() {
                if let Some(key) = spec.primary_key.clone() {
                    return scalar_query(store, spec, vec![key], diag).await;
                }
            }
            bulk_query(store, spec, Vec::new(), diag).await
        }
        StorageKind::DoubleMap => {
            let Some(primary) = spec.primary_key.clone() else {
                return Err(QueryError::invalid_argument(
                    "a double map query requires a primary key",
                ));
            };
            match spec.secondary_key.clone() {
                Some(secondary) => scalar_query(store, spec, vec![primary, secondary], diag).await,
                None => bulk_query(store, spec, vec![primary], diag).await,
            }
        }
    }
}

/// Direct lookup of a single value. Failures degrade to `Scalar(null)`.
async fn scalar_query(
    store: &dyn StateStore,
    spec: &QuerySpec,
    keys: Vec<String>,
    diag: &dyn Diagnostics,
) -> QueryResult<RawResult> {
    match store.query(&spec.module, &spec.item, &keys).await {
        Ok(value) => Ok(RawResult::Scalar(value)),
        Err(err) => {
            diag.record(DiagnosticEvent::CallFailed {
                call: "query",
                module: &spec.module,
                item: &spec.item,
                keys: &keys,
                message: &err.to_string(),
            });
            Ok(RawResult::Scalar(Value::Null))
        }
    }
}

/// Constant lookup. Both failure modes are fatal.
async fn constant_query(store: &dyn StateStore, spec: &QuerySpec) -> QueryResult<RawResult> {
    match store.get_constant(&spec.module, &spec.item).await {
        Ok(value) => Ok(RawResult::Scalar(value)),
        Err(StoreError::NotFound { module, name }) => {
            Err(QueryError::ConstantNotFound { module, name })
        }
        Err(StoreError::Unavailable(message)) => Err(QueryError::remote_unavailable(
            format!("get_constant(\"{}\", \"{}\")", spec.module, spec.item),
            message,
        )),
    }
}

/// Bulk iteration with optional allow-list filtering.
///
/// The filter is loaded at most once and consulted in delivery order;
/// remote failures degrade to an empty map. An unreadable filter file
/// is fatal and aborts before the remote call.
async fn bulk_query(
    store: &dyn StateStore,
    spec: &QuerySpec,
    keys: Vec<String>,
    diag: &dyn Diagnostics,
) -> QueryResult<RawResult> {
    let filters = match &spec.filter_source {
        Some(path) => {
            let filters = filter::load(path, diag)?;
            diag.record(DiagnosticEvent::FilterLoaded {
                path,
                entries: filters.len(),
            });
            Some(filters)
        }
        None => None,
    };

    let entries = match store.query_map(&spec.module, &spec.item, &keys).await {
        Ok(entries) => entries,
        Err(err) => {
            diag.record(DiagnosticEvent::CallFailed {
                call: "query_map",
                module: &spec.module,
                item: &spec.item,
                keys: &keys,
                message: &err.to_string(),
            });
            Vec::new()
        }
    };

    let retained: Vec<(String, Value)> = entries
        .into_iter()
        .filter(|(key, _)| filters.as_ref().map_or(true, |f| f.contains(key)))
        .collect();

    diag.record(DiagnosticEvent::EntriesRetained {
        entries: retained.len(),
    });

    Ok(RawResult::Map(retained))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::testing::{CollectingDiagnostics, RecordedEvent};
    use crate::diag::NullDiagnostics;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory store: one scalar answer, one map answer, a constant
    /// table, plus switches for the failure modes.
    #[derive(Default)]
    struct MockStore {
        scalar: Option<Value>,
        entries: Vec<(String, Value)>,
        constant: Option<Value>,
        unavailable: bool,
        calls: AtomicUsize,
    }

    impl MockStore {
        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StateStore for MockStore {
        async fn query(
            &self,
            _module: &str,
            _item: &str,
            _keys: &[String],
        ) -> Result<Value, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            Ok(self.scalar.clone().unwrap_or(Value::Null))
        }

        async fn query_map(
            &self,
            _module: &str,
            _item: &str,
            _keys: &[String],
        ) -> Result<Vec<(String, Value)>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            Ok(self.entries.clone())
        }

        async fn get_constant(&self, module: &str, name: &str) -> Result<Value, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            self.constant.clone().ok_or_else(|| StoreError::NotFound {
                module: module.to_string(),
                name: name.to_string(),
            })
        }
    }

    fn spec(kind: StorageKind, primary: Option<&str>, secondary: Option<&str>) -> QuerySpec {
        QuerySpec::new(
            "Balances",
            "Account",
            kind,
            primary.map(str::to_string),
            secondary.map(str::to_string),
            None,
        )
    }

    #[tokio::test]
    async fn item_query_returns_scalar() {
        let store = MockStore {
            scalar: Some(json!({"free": 10})),
            ..Default::default()
        };
        let result = execute(&store, &spec(StorageKind::Item, None, None), &NullDiagnostics)
            .await
            .unwrap();
        assert_eq!(result, RawResult::Scalar(json!({"free": 10})));
    }

    #[tokio::test]
    async fn item_query_recovers_from_unavailable_store() {
        let store = MockStore {
            unavailable: true,
            ..Default::default()
        };
        let result = execute(&store, &spec(StorageKind::Item, None, None), &NullDiagnostics)
            .await
            .unwrap();
        assert_eq!(result, RawResult::Scalar(Value::Null));
    }

    #[tokio::test]
    async fn map_query_without_key_returns_entries_in_delivery_order() {
        let store = MockStore {
            entries: vec![
                ("Z".to_string(), json!(3)),
                ("A".to_string(), json!(1)),
                ("M".to_string(), json!(2)),
            ],
            ..Default::default()
        };
        let result = execute(&store, &spec(StorageKind::Map, None, None), &NullDiagnostics)
            .await
            .unwrap();
        let RawResult::Map(entries) = result else {
            panic!("expected a map result");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Z", "A", "M"]);
    }

    #[tokio::test]
    async fn map_query_with_key_takes_the_scalar_path() {
        let store = MockStore {
            scalar: Some(json!(7)),
            ..Default::default()
        };
        let result = execute(
            &store,
            &spec(StorageKind::Map, Some("A1"), None),
            &NullDiagnostics,
        )
        .await
        .unwrap();
        assert_eq!(result, RawResult::Scalar(json!(7)));
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn map_query_applies_filter_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"A\nM\n").unwrap();

        let store = MockStore {
            entries: vec![
                ("Z".to_string(), json!(3)),
                ("A".to_string(), json!(1)),
                ("M".to_string(), json!(2)),
            ],
            ..Default::default()
        };
        let spec = QuerySpec::new(
            "Balances",
            "Account",
            StorageKind::Map,
            None,
            None,
            Some(PathBuf::from(file.path())),
        );
        let result = execute(&store, &spec, &NullDiagnostics).await.unwrap();
        let RawResult::Map(entries) = result else {
            panic!("expected a map result");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["A", "M"]);
    }

    #[tokio::test]
    async fn empty_filter_suppresses_every_row() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let store = MockStore {
            entries: vec![("A".to_string(), json!(1))],
            ..Default::default()
        };
        let spec = QuerySpec::new(
            "Balances",
            "Account",
            StorageKind::Map,
            None,
            None,
            Some(PathBuf::from(file.path())),
        );
        let result = execute(&store, &spec, &NullDiagnostics).await.unwrap();
        assert_eq!(result, RawResult::Map(Vec::new()));
    }

    #[tokio::test]
    async fn bulk_query_reports_filter_and_retention_counts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"A\nM\n").unwrap();

        let store = MockStore {
            entries: vec![
                ("Z".to_string(), json!(3)),
                ("A".to_string(), json!(1)),
            ],
            ..Default::default()
        };
        let spec = QuerySpec::new(
            "Balances",
            "Account",
            StorageKind::Map,
            None,
            None,
            Some(PathBuf::from(file.path())),
        );
        let diag = CollectingDiagnostics::default();
        execute(&store, &spec, &diag).await.unwrap();

        assert_eq!(
            diag.events(),
            vec![
                RecordedEvent::FilterLoaded { entries: 2 },
                RecordedEvent::EntriesRetained { entries: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn failed_call_reports_its_exact_signature() {
        let store = MockStore {
            unavailable: true,
            ..Default::default()
        };
        let diag = CollectingDiagnostics::default();
        execute(
            &store,
            &spec(StorageKind::Map, Some("5Gw3"), None),
            &diag,
        )
        .await
        .unwrap();

        assert_eq!(
            diag.events(),
            vec![RecordedEvent::CallFailed {
                call: "query".to_string(),
                module: "Balances".to_string(),
                item: "Account".to_string(),
                keys: vec!["5Gw3".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn failed_bulk_call_still_reports_retention() {
        let store = MockStore {
            unavailable: true,
            ..Default::default()
        };
        let diag = CollectingDiagnostics::default();
        execute(&store, &spec(StorageKind::Map, None, None), &diag)
            .await
            .unwrap();

        assert_eq!(
            diag.events(),
            vec![
                RecordedEvent::CallFailed {
                    call: "query_map".to_string(),
                    module: "Balances".to_string(),
                    item: "Account".to_string(),
                    keys: Vec::new(),
                },
                RecordedEvent::EntriesRetained { entries: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn empty_filter_path_disables_filtering() {
        let store = MockStore {
            entries: vec![("A".to_string(), json!(1))],
            ..Default::default()
        };
        let spec = QuerySpec::new(
            "Balances",
            "Account",
            StorageKind::Map,
            None,
            None,
            Some(PathBuf::new()),
        );
        let result = execute(&store, &spec, &NullDiagnostics).await.unwrap();
        assert_eq!(result, RawResult::Map(vec![("A".to_string(), json!(1))]));
    }

    #[tokio::test]
    async fn unreadable_filter_aborts_before_the_remote_call() {
        let store = MockStore::default();
        let spec = QuerySpec::new(
            "Balances",
            "Account",
            StorageKind::Map,
            None,
            None,
            Some(PathBuf::from("/nonexistent/filters.json")),
        );
        let err = execute(&store, &spec, &NullDiagnostics).await.unwrap_err();
        assert!(matches!(err, QueryError::ResourceUnavailable { .. }));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn map_query_recovers_from_unavailable_store() {
        let store = MockStore {
            unavailable: true,
            ..Default::default()
        };
        let result = execute(&store, &spec(StorageKind::Map, None, None), &NullDiagnostics)
            .await
            .unwrap();
        assert_eq!(result, RawResult::Map(Vec::new()));
    }

    #[tokio::test]
    async fn double_map_without_primary_key_fails_before_any_call() {
        let store = MockStore::default();
        let err = execute(
            &store,
            &spec(StorageKind::DoubleMap, None, None),
            &NullDiagnostics,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument { .. }));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn double_map_with_secondary_key_takes_the_scalar_path() {
        let store = MockStore {
            scalar: Some(json!("direct")),
            ..Default::default()
        };
        let result = execute(
            &store,
            &spec(StorageKind::DoubleMap, Some("era"), Some("acct")),
            &NullDiagnostics,
        )
        .await
        .unwrap();
        assert_eq!(result, RawResult::Scalar(json!("direct")));
    }

    #[tokio::test]
    async fn double_map_without_secondary_key_iterates() {
        let store = MockStore {
            entries: vec![("acct".to_string(), json!(5))],
            ..Default::default()
        };
        let result = execute(
            &store,
            &spec(StorageKind::DoubleMap, Some("era"), None),
            &NullDiagnostics,
        )
        .await
        .unwrap();
        assert_eq!(result, RawResult::Map(vec![("acct".to_string(), json!(5))]));
    }

    #[tokio::test]
    async fn constant_query_returns_value() {
        let store = MockStore {
            constant: Some(json!(1000)),
            ..Default::default()
        };
        let result = execute(&store, &spec(StorageKind::Const, None, None), &NullDiagnostics)
            .await
            .unwrap();
        assert_eq!(result, RawResult::Scalar(json!(1000)));
    }

    #[tokio::test]
    async fn missing_constant_is_fatal() {
        let store = MockStore::default();
        let err = execute(&store, &spec(StorageKind::Const, None, None), &NullDiagnostics)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::ConstantNotFound { .. }));
    }

    #[tokio::test]
    async fn unreachable_constant_is_fatal() {
        let store = MockStore {
            unavailable: true,
            ..Default::default()
        };
        let err = execute(&store, &spec(StorageKind::Const, None, None), &NullDiagnostics)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::RemoteUnavailable { .. }));
    }
}
