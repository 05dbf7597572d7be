//! Merges raw catalog records with popularity metrics.

use super::cache::{Lookup, MetricsCache};
use super::throttler::Throttler;
use super::{Metrics, MetricsProvider, PackageRecord, PackageRef, ProviderError, RawRecord, RepoSpec, Timed};
use chrono::Utc;
use core::time::Duration;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

const LOG_TARGET: &str = "    enrich";

/// Longest pause honored for a single rate limit.
pub const MAX_RATE_LIMIT_PAUSE: Duration = Duration::from_mins(15);

/// Pause applied when a host rate-limits us without saying until when.
const DEFAULT_RATE_LIMIT_PAUSE: Duration = Duration::from_mins(1);

/// Enriched records plus how many of them fell back to zero metrics.
#[derive(Debug, Clone, Default)]
pub struct EnrichOutcome {
    pub records: Vec<PackageRecord>,
    pub degraded: usize,
}

/// Resolves metrics for every record through the shared cache.
#[derive(Debug)]
pub struct CatalogEnricher<P> {
    provider: Arc<Timed<P>>,
    cache: Arc<MetricsCache>,
    throttler: Arc<Throttler>,
}

impl<P> Clone for CatalogEnricher<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            cache: Arc::clone(&self.cache),
            throttler: Arc::clone(&self.throttler),
        }
    }
}

impl<P: MetricsProvider + 'static> CatalogEnricher<P> {
    /// `lookup_timeout` bounds each provider call; `max_concurrent` bounds how many run at once.
    pub fn new(provider: P, cache: Arc<MetricsCache>, max_concurrent: usize, lookup_timeout: Duration) -> Self {
        Self {
            provider: Arc::new(Timed::new(provider, lookup_timeout)),
            cache,
            throttler: Throttler::new(max_concurrent),
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<MetricsCache> {
        &self.cache
    }

    /// Enrich `raw` with metrics, keeping input order.
    ///
    /// Records naming the same package on the same repository are looked up
    /// once; packages sharing a repository each get their own lookup, since
    /// downloads are counted per package. Each lookup runs as a
    /// detached task, so dropping the returned future does not stop lookups
    /// already started from landing in the cache.
    pub async fn enrich(&self, raw: Vec<RawRecord>) -> EnrichOutcome {
        let mut packages: Vec<PackageRef> = Vec::new();
        let mut slot_by_key: HashMap<String, usize> = HashMap::new();
        let mut slots: Vec<Option<usize>> = Vec::with_capacity(raw.len());

        for record in &raw {
            match RepoSpec::parse(&record.repository) {
                Ok(repo) => {
                    let package = PackageRef::new(record.name.as_str(), repo);
                    let next = packages.len();
                    let slot = *slot_by_key.entry(package.cache_key()).or_insert(next);
                    if slot == next {
                        packages.push(package);
                    }
                    slots.push(Some(slot));
                }
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Package '{}' gets zero metrics: {e}", record.name);
                    slots.push(None);
                }
            }
        }

        log::info!(target: LOG_TARGET, "Resolving metrics for {} package(s) with {} lookup(s)", raw.len(), packages.len());

        let handles: Vec<_> = packages.into_iter().map(|package| self.spawn_lookup(package)).collect();
        let lookups: Vec<Lookup> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Lookup::Fallback(Arc::new(ProviderError::Task(e.to_string())))))
            .collect();

        let mut degraded = 0;
        let records: Vec<PackageRecord> = raw
            .into_iter()
            .zip(slots)
            .map(|(record, slot)| {
                let metrics = match slot.map(|s| &lookups[s]) {
                    Some(lookup) if !lookup.is_fallback() => lookup.metrics(),
                    _ => {
                        degraded += 1;
                        Metrics::FALLBACK
                    }
                };
                PackageRecord::from_raw(record, metrics)
            })
            .collect();

        if degraded > 0 {
            log::warn!(target: LOG_TARGET, "{degraded} of {} package(s) have zero metrics", records.len());
        }

        EnrichOutcome { records, degraded }
    }

    fn spawn_lookup(&self, package: PackageRef) -> tokio::task::JoinHandle<Lookup> {
        let provider = Arc::clone(&self.provider);
        let cache = Arc::clone(&self.cache);
        let throttler = Arc::clone(&self.throttler);

        tokio::spawn(async move {
            // Cache hits need neither a slot nor a live rate limit budget
            if let Some(metrics) = cache.cached(&package) {
                return Lookup::Cached(metrics);
            }

            let Some(_permit) = throttler.acquire().await else {
                log::debug!(target: LOG_TARGET, "Skipping lookup for {package} while rate limited");
                return Lookup::Fallback(Arc::new(ProviderError::RateLimited {
                    host: package.repo().host().to_string(),
                    reset_at: None,
                }));
            };

            let lookup = cache.get_or_fetch(&package, &*provider).await;

            if let Some(ProviderError::RateLimited { host, reset_at }) = lookup.error() {
                let pause = reset_at
                    .and_then(|at| at.signed_duration_since(Utc::now()).to_std().ok())
                    .unwrap_or(DEFAULT_RATE_LIMIT_PAUSE)
                    .min(MAX_RATE_LIMIT_PAUSE);

                if throttler.pause_for(pause) {
                    log::warn!(target: LOG_TARGET, "Rate limited by {host}, holding back lookups for {}s", pause.as_secs());
                }
            }

            lookup
        })
    }
}
