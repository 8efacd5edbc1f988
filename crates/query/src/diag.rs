//! Diagnostics sink for observable but non-semantic output.
//!
//! The filter loader and the executor report progress and recovered
//! failures through an injected [`Diagnostics`] implementation instead
//! of ambient logging calls, so the core engine carries no hidden
//! process-wide state.

use std::path::Path;

/// A single diagnostic event emitted by the engine.
#[derive(Debug)]
pub enum DiagnosticEvent<'a> {
    /// An allow-list was loaded for a bulk query.
    FilterLoaded {
        /// Source file of the allow-list.
        path: &'a Path,
        /// Number of keys loaded.
        entries: usize,
    },
    /// The allow-list did not parse as JSON and was read line by line.
    FilterJsonFallback {
        /// Source file of the allow-list.
        path: &'a Path,
    },
    /// A bulk query finished; `entries` rows survived filtering.
    EntriesRetained {
        /// Number of retained entries.
        entries: usize,
    },
    /// A remote call failed and was recovered into an empty result.
    CallFailed {
        /// Store method that was attempted.
        call: &'a str,
        /// Storage category.
        module: &'a str,
        /// Storage item.
        item: &'a str,
        /// Key arguments of the attempted call.
        keys: &'a [String],
        /// Error reported by the store.
        message: &'a str,
    },
}

/// Sink for [`DiagnosticEvent`]s.
pub trait Diagnostics {
    /// Records one event.
    fn record(&self, event: DiagnosticEvent<'_>);
}

/// Production sink forwarding events to `tracing`.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: DiagnosticEvent<'_>) {
        match event {
            DiagnosticEvent::FilterLoaded { path, entries } => {
                tracing::info!("filtering {} keys from {}", entries, path.display());
            }
            DiagnosticEvent::FilterJsonFallback { path } => {
                tracing::info!(
                    "could not parse {} as JSON, reading line by line",
                    path.display()
                );
            }
            DiagnosticEvent::EntriesRetained { entries } => {
                tracing::info!("result has {} entries", entries);
            }
            DiagnosticEvent::CallFailed {
                call,
                module,
                item,
                keys,
                message,
            } => {
                tracing::error!(
                    "connection lost in {call}(\"{module}\", \"{item}\", {keys:?}): {message}"
                );
            }
        }
    }
}

/// Sink that drops every event.
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn record(&self, _event: DiagnosticEvent<'_>) {}
}
