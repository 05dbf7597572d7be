//! Time-bounded caching of popularity metrics.
//!
//! [`MetricsCache`] sits between the enricher and a [`MetricsProvider`]. A value
//! fetched for a package is reused until its TTL runs out; failed lookups are
//! never stored, so the next call tries the provider again.

mod backend;
mod file;
mod memory;

pub use backend::CacheBackend;
pub use file::FileBackend;
pub use memory::MemoryBackend;

use super::{Metrics, MetricsProvider, PackageRef, ProviderError};
use crate::Result;
use core::time::Duration;
use std::sync::Arc;

const LOG_TARGET: &str = "   metrics";

/// Default time a fetched metrics value stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_hours(1);

/// Outcome of a cached metrics lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Served from the cache without contacting the provider.
    Cached(Metrics),

    /// Fetched from the provider and stored.
    Fetched(Metrics),

    /// The provider failed; the record gets [`Metrics::FALLBACK`].
    Fallback(Arc<ProviderError>),
}

impl Lookup {
    /// Metrics to merge into the record, zero for a fallback.
    #[must_use]
    pub const fn metrics(&self) -> Metrics {
        match self {
            Self::Cached(metrics) | Self::Fetched(metrics) => *metrics,
            Self::Fallback(_) => Metrics::FALLBACK,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// The failure behind a fallback, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            Self::Fallback(e) => Some(e),
            _ => None,
        }
    }
}

/// Shared, keyed, time-bounded metrics cache.
#[derive(Debug, Clone)]
pub struct MetricsCache {
    backend: Arc<dyn CacheBackend<Metrics>>,
    ttl: Duration,
}

impl MetricsCache {
    #[must_use]
    pub fn new(backend: impl CacheBackend<Metrics> + 'static, ttl: Duration) -> Self {
        Self {
            backend: Arc::new(backend),
            ttl,
        }
    }

    /// A cache held in process memory.
    #[must_use]
    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(MemoryBackend::new(), ttl)
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns cached metrics for the package without contacting any provider.
    #[must_use]
    pub fn cached(&self, package: &PackageRef) -> Option<Metrics> {
        self.backend.get(&package.cache_key())
    }

    /// Returns cached metrics for the package, fetching them on a miss.
    pub async fn get_or_fetch<P: MetricsProvider>(&self, package: &PackageRef, provider: &P) -> Lookup {
        let key = package.cache_key();

        if let Some(metrics) = self.backend.get(&key) {
            return Lookup::Cached(metrics);
        }

        log::info!(target: LOG_TARGET, "Fetching metrics for {package}");
        match provider.fetch(package).await {
            Ok(metrics) => {
                if let Err(e) = self.backend.set(&key, metrics, self.ttl) {
                    log::debug!(target: LOG_TARGET, "Could not save cache entry for '{key}': {e:#}");
                }
                Lookup::Fetched(metrics)
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not fetch metrics for {package}, using zero metrics: {e}");
                Lookup::Fallback(Arc::new(e))
            }
        }
    }

    /// Drops every cached entry.
    pub fn clear(&self) -> Result<()> {
        self.backend.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RepoSpec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct ScriptedProvider {
        calls: AtomicUsize,
        fail: Mutex<bool>,
    }

    impl ScriptedProvider {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl MetricsProvider for ScriptedProvider {
        async fn fetch(&self, _package: &PackageRef) -> core::result::Result<Metrics, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
            if *self.fail.lock().unwrap() {
                return Err(ProviderError::Status {
                    url: "https://api.github.com/repos/acme/widgets".to_string(),
                    status: 502,
                });
            }
            Ok(Metrics {
                stars: 100 + call,
                downloads: 1000,
            })
        }
    }

    fn package(repo: &str) -> PackageRef {
        named("widgets", repo)
    }

    fn named(name: &str, repo: &str) -> PackageRef {
        PackageRef::new(name, RepoSpec::parse(repo).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl_skips_provider() {
        let cache = MetricsCache::in_memory(Duration::from_secs(60));
        let provider = ScriptedProvider::default();

        let first = cache.get_or_fetch(&package("acme/widgets"), &provider).await;
        let second = cache.get_or_fetch(&package("acme/widgets"), &provider).await;

        assert!(matches!(first, Lookup::Fetched(m) if m.stars == 100));
        assert!(matches!(second, Lookup::Cached(m) if m.stars == 100));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_refetched() {
        let cache = MetricsCache::in_memory(Duration::from_secs(60));
        let provider = ScriptedProvider::default();

        let _ = cache.get_or_fetch(&package("acme/widgets"), &provider).await;
        tokio::time::advance(Duration::from_secs(61)).await;
        let again = cache.get_or_fetch(&package("acme/widgets"), &provider).await;

        assert!(matches!(again, Lookup::Fetched(m) if m.stars == 101));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn equivalent_identifiers_share_an_entry() {
        let cache = MetricsCache::in_memory(Duration::from_secs(60));
        let provider = ScriptedProvider::default();

        let _ = cache.get_or_fetch(&package("acme/widgets"), &provider).await;
        let lookup = cache
            .get_or_fetch(&package("https://github.com/acme/widgets.git"), &provider)
            .await;

        assert!(matches!(lookup, Lookup::Cached(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn packages_of_one_repository_get_separate_entries() {
        let cache = MetricsCache::in_memory(Duration::from_secs(60));
        let provider = ScriptedProvider::default();

        let _ = cache.get_or_fetch(&named("widgets", "acme/monorepo"), &provider).await;
        let other = cache.get_or_fetch(&named("gadgets", "acme/monorepo"), &provider).await;

        assert!(matches!(other, Lookup::Fetched(_)));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failure_falls_back_and_is_not_cached() {
        let cache = MetricsCache::in_memory(Duration::from_secs(60));
        let provider = ScriptedProvider::default();
        provider.set_failing(true);

        let failed = cache.get_or_fetch(&package("acme/widgets"), &provider).await;
        assert!(failed.is_fallback());
        assert_eq!(failed.metrics(), Metrics::FALLBACK);
        assert!(matches!(failed.error(), Some(ProviderError::Status { status: 502, .. })));

        provider.set_failing(false);
        let recovered = cache.get_or_fetch(&package("acme/widgets"), &provider).await;
        assert!(matches!(recovered, Lookup::Fetched(_)));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let cache = MetricsCache::in_memory(Duration::from_secs(60));
        let provider = ScriptedProvider::default();

        let _ = cache.get_or_fetch(&package("acme/widgets"), &provider).await;
        cache.clear().unwrap();
        let lookup = cache.get_or_fetch(&package("acme/widgets"), &provider).await;

        assert!(matches!(lookup, Lookup::Fetched(_)));
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn lookup_metrics_accessor() {
        let metrics = Metrics { stars: 3, downloads: 4 };
        assert_eq!(Lookup::Cached(metrics).metrics(), metrics);
        assert_eq!(Lookup::Fetched(metrics).metrics(), metrics);
        assert!(Lookup::Cached(metrics).error().is_none());
    }
}
