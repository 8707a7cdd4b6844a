//! In-memory series cache keyed by source identifier.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Series;

/// Thread-safe map from source key to a normalized, immutable series.
///
/// Entries live until [`SeriesCache::clear`]; there is no TTL, matching the
/// page-reload lifecycle of the consuming chart. Puts are idempotent and
/// last-write-wins: cached series are immutable and interchangeable, so a
/// racing refetch overwriting an entry is harmless.
#[derive(Debug, Clone, Default)]
pub struct SeriesCache {
    inner: Arc<tokio::sync::RwLock<HashMap<String, Arc<Series>>>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Series>> {
        let store = self.inner.read().await;
        store.get(key).cloned()
    }

    /// Insert a series and return the shared handle now stored.
    pub async fn put(&self, key: impl Into<String>, series: Series) -> Arc<Series> {
        let series = Arc::new(series);
        let mut store = self.inner.write().await;
        store.insert(key.into(), Arc::clone(&series));
        series
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
