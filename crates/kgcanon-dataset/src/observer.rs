//! Load-time observability.
//!
//! The loader never touches global logging state; it reports to whatever
//! [`LoadObserver`] it was handed. Binaries decide where events go.

use std::path::Path;

pub trait LoadObserver: Send + Sync {
    /// A table file was parsed into `records` rows.
    fn table_loaded(&self, path: &Path, records: usize);

    /// Rows were skipped because they reference unknown symbols.
    fn rows_dropped(&self, path: &Path, dropped: usize);

    /// The optional gold-cluster file is absent.
    fn gold_missing(&self, path: &Path);
}

/// Forwards load events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn table_loaded(&self, path: &Path, records: usize) {
        tracing::info!(file = %path.display(), records, "table loaded");
    }

    fn rows_dropped(&self, path: &Path, dropped: usize) {
        if dropped > 0 {
            tracing::debug!(file = %path.display(), dropped, "rows with unknown symbols skipped");
        }
    }

    fn gold_missing(&self, path: &Path) {
        tracing::warn!(file = %path.display(), "gold clusters not found; continuing without");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LoadObserver for NoopObserver {
    fn table_loaded(&self, _path: &Path, _records: usize) {}
    fn rows_dropped(&self, _path: &Path, _dropped: usize) {}
    fn gold_missing(&self, _path: &Path) {}
}
