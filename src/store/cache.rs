//! TTL-bounded, write-through cache over a [`ConfigStore`].
//!
//! # Responsibilities
//! - Serve routing snapshots from memory while younger than the TTL
//! - Refresh from the store on miss or expiry
//! - Make a successful write visible to the next read without a store round-trip
//!
//! # Design Decisions
//! - The entry is an `ArcSwapOption`: readers never observe a half-replaced entry
//! - A failed store read never touches the entry
//! - No single-flight: concurrent misses may each hit the store
//! - Time comes from the tokio clock, so tests can pause and advance it

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::time::Instant;

use crate::observability::metrics;
use crate::routing::{RouteTable, RoutingConfig};
use crate::store::{ConfigStore, StoreError};

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CacheEntry {
    table: Arc<RouteTable>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(config: RoutingConfig, fetched_at: Instant) -> Arc<Self> {
        Arc::new(Self {
            table: Arc::new(RouteTable::new(config)),
            fetched_at,
        })
    }
}

/// Process-local routing config cache.
pub struct ConfigCache {
    store: Arc<dyn ConfigStore>,
    key: String,
    ttl: Duration,
    entry: ArcSwapOption<CacheEntry>,
}

impl ConfigCache {
    pub fn new(store: Arc<dyn ConfigStore>, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
            entry: ArcSwapOption::empty(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current routes, falling back to an empty table if the store fails.
    ///
    /// The fallback is returned for this call only and is never cached.
    pub async fn read(&self) -> Arc<RouteTable> {
        match self.try_read().await {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Config store read failed, serving empty routes");
                Arc::new(RouteTable::default())
            }
        }
    }

    /// Current routes, or the store error if a refresh was needed and failed.
    pub async fn try_read(&self) -> Result<Arc<RouteTable>, StoreError> {
        let now = Instant::now();

        if let Some(entry) = self.entry.load_full() {
            if now.saturating_duration_since(entry.fetched_at) < self.ttl {
                metrics::record_cache_lookup("hit");
                return Ok(Arc::clone(&entry.table));
            }
        }
        // Outcomes are exclusive: a failed refresh counts as `error` only.
        let config = match self.store.get(&self.key).await {
            Ok(config) => {
                metrics::record_cache_lookup("miss");
                config.unwrap_or_default()
            }
            Err(e) => {
                metrics::record_cache_lookup("error");
                return Err(e);
            }
        };

        tracing::debug!(key = %self.key, routes = config.routes.len(), "Config refreshed from store");

        // A write that completed while we were fetching is newer than what we read.
        let fresh = CacheEntry::new(config, now);
        let previous = self.entry.rcu(|current| match current {
            Some(existing) if existing.fetched_at > now => Some(Arc::clone(existing)),
            _ => Some(Arc::clone(&fresh)),
        });

        match previous {
            Some(existing) if existing.fetched_at > now => Ok(Arc::clone(&existing.table)),
            _ => Ok(Arc::clone(&fresh.table)),
        }
    }

    /// Persist `config`, then make it the cached value.
    ///
    /// On store failure the cache is left untouched and the error is returned.
    pub async fn write(&self, config: RoutingConfig) -> Result<(), StoreError> {
        if let Err(e) = self.store.set(&self.key, &config).await {
            metrics::record_config_write("error");
            return Err(e);
        }
        metrics::record_config_write("ok");
        self.entry.store(Some(CacheEntry::new(config, Instant::now())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Route;
    use crate::store::InMemoryConfigStore;
    use async_trait::async_trait;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use metrics_util::MetricKind;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const KEY: &str = "proxy_config_v1";

    /// Wraps an in-memory store, counting calls and optionally failing them.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryConfigStore,
        gets: AtomicUsize,
        sets: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingStore {
        fn gets(&self) -> usize {
            self.gets.load(Ordering::SeqCst)
        }

        fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ConfigStore for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<RoutingConfig>, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("offline".into()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, config: &RoutingConfig) -> Result<(), StoreError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("offline".into()));
            }
            self.inner.set(key, config).await
        }
    }

    fn config(path: &str, target: &str) -> RoutingConfig {
        RoutingConfig::new(vec![Route::new(path, target)])
    }

    fn cache(store: &Arc<CountingStore>) -> ConfigCache {
        ConfigCache::new(store.clone(), KEY, DEFAULT_TTL)
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_key_reads_as_empty_and_is_cached() {
        let store = Arc::new(CountingStore::default());
        let cache = cache(&store);

        assert!(cache.read().await.is_empty());
        assert!(cache.read().await.is_empty());
        assert_eq!(store.gets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_skips_store() {
        let store = Arc::new(CountingStore::default());
        store.inner.set(KEY, &config("/a", "http://x")).await.unwrap();
        let cache = cache(&store);

        cache.read().await;
        tokio::time::advance(Duration::from_secs(59)).await;
        let table = cache.read().await;

        assert_eq!(store.gets(), 1);
        assert_eq!(table.config(), &config("/a", "http://x"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_is_visible_without_store_read() {
        let store = Arc::new(CountingStore::default());
        let cache = cache(&store);

        cache.write(config("/a", "http://x")).await.unwrap();
        let table = cache.read().await;

        assert_eq!(store.gets(), 0);
        assert_eq!(table.config(), &config("/a", "http://x"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_resets_freshness_window() {
        let store = Arc::new(CountingStore::default());
        let cache = cache(&store);

        cache.read().await;
        tokio::time::advance(Duration::from_secs(50)).await;
        cache.write(config("/a", "http://x")).await.unwrap();
        tokio::time::advance(Duration::from_secs(50)).await;
        cache.read().await;

        assert_eq!(store.gets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_picks_up_new_store_value() {
        let store = Arc::new(CountingStore::default());
        store.inner.set(KEY, &config("/a", "http://old")).await.unwrap();
        let cache = cache(&store);
        cache.read().await;

        // Another instance rewrote the store behind our back.
        store.inner.set(KEY, &config("/a", "http://new")).await.unwrap();
        assert_eq!(cache.read().await.config(), &config("/a", "http://old"));

        tokio::time::advance(DEFAULT_TTL).await;
        assert_eq!(cache.read().await.config(), &config("/a", "http://new"));
        assert_eq!(store.gets(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outage_without_entry_yields_empty_routes() {
        let store = Arc::new(CountingStore::default());
        store.set_failing(true);
        let cache = cache(&store);

        let table = cache.read().await;
        assert!(table.is_empty());
        assert!(table.resolve("/anything").is_none());
        assert!(cache.try_read().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outage_fallback_is_not_cached() {
        let store = Arc::new(CountingStore::default());
        store.inner.set(KEY, &config("/a", "http://x")).await.unwrap();
        store.set_failing(true);
        let cache = cache(&store);

        assert!(cache.read().await.is_empty());
        store.set_failing(false);
        assert_eq!(cache.read().await.config(), &config("/a", "http://x"));
        assert_eq!(store.gets(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_leaves_cache_untouched() {
        let store = Arc::new(CountingStore::default());
        let cache = cache(&store);
        cache.write(config("/a", "http://x")).await.unwrap();

        store.set_failing(true);
        assert!(cache.write(config("/b", "http://y")).await.is_err());

        assert_eq!(cache.read().await.config(), &config("/a", "http://x"));
        assert_eq!(store.sets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_boundary_is_stale() {
        let store = Arc::new(CountingStore::default());
        let cache = ConfigCache::new(store.clone(), KEY, Duration::from_secs(5));

        cache.read().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.read().await;

        assert_eq!(store.gets(), 2);
    }

    /// Snapshots the stored value on `get`, then holds the result until released.
    struct GatedStore {
        inner: InMemoryConfigStore,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ConfigStore for GatedStore {
        async fn get(&self, key: &str) -> Result<Option<RoutingConfig>, StoreError> {
            let snapshot = self.inner.get(key).await;
            self.entered.notify_one();
            self.release.notified().await;
            snapshot
        }

        async fn set(&self, key: &str, config: &RoutingConfig) -> Result<(), StoreError> {
            self.inner.set(key, config).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_does_not_clobber_newer_write() {
        let store = Arc::new(GatedStore {
            inner: InMemoryConfigStore::with_config(KEY, config("/a", "http://old")),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let cache = Arc::new(ConfigCache::new(store.clone(), KEY, DEFAULT_TTL));

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read().await }
        });
        store.entered.notified().await;

        tokio::time::advance(Duration::from_secs(1)).await;
        cache.write(config("/a", "http://new")).await.unwrap();
        store.release.notify_one();

        let raced = reader.await.unwrap();
        assert_eq!(raced.config(), &config("/a", "http://new"));
        assert_eq!(cache.read().await.config(), &config("/a", "http://new"));
    }

    fn lookup_counts(recorder: &DebuggingRecorder) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for (key, _, _, value) in recorder.snapshotter().snapshot().into_vec() {
            if key.kind() != MetricKind::Counter || key.key().name() != "config_cache_lookups_total" {
                continue;
            }
            let outcome = key
                .key()
                .labels()
                .find(|label| label.key() == "outcome")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            if let DebugValue::Counter(n) = value {
                counts.insert(outcome, n);
            }
        }
        counts
    }

    #[test]
    fn test_lookup_outcomes_are_exclusive() {
        let recorder = DebuggingRecorder::new();

        ::metrics::with_local_recorder(&recorder, || {
            // Current-thread runtime so every lookup runs on the recorder's thread.
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let store = Arc::new(CountingStore::default());
                let cache = cache(&store);

                store.set_failing(true);
                cache.read().await;
                store.set_failing(false);
                cache.read().await;
                cache.read().await;
            });
        });

        let expected: BTreeMap<String, u64> = [("error", 1), ("hit", 1), ("miss", 1)]
            .into_iter()
            .map(|(outcome, n)| (outcome.to_string(), n))
            .collect();
        assert_eq!(lookup_counts(&recorder), expected);
    }
}
