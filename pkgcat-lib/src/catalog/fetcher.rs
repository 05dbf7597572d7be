use super::aggregator::{CategorySummary, summarize};
use super::cache::MetricsCache;
use super::enricher::CatalogEnricher;
use super::query::{DEFAULT_PAGE_SIZE, PageMeta, QueryEngine, QueryOptions};
use super::sources::CatalogSource;
use super::{CatalogError, ConfigError, MetricsProvider, PackageRecord, RawRecord, SourceError};
use core::time::Duration;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

const LOG_TARGET: &str = "   fetcher";

pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for [`PackagesFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherSettings {
    pub page_size: usize,
    pub case_insensitive_search: bool,
    pub max_concurrent_lookups: usize,
    pub lookup_timeout: Duration,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            case_insensitive_search: false,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl FetcherSettings {
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.max_concurrent_lookups == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::ZeroLookupTimeout);
        }
        Ok(())
    }
}

/// What a single fetch returns.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    /// The requested page of matching packages.
    pub packages: Vec<PackageRecord>,

    /// Category counts over the whole enriched catalog, ignoring the query.
    pub categories: Vec<CategorySummary>,

    pub meta: PageMeta,

    /// How many catalog entries fell back to zero metrics.
    #[serde(skip)]
    pub degraded: usize,
}

/// Runs the source → enrich → summarize/query pipeline.
#[derive(Debug)]
pub struct PackagesFetcher<S, P> {
    source: S,
    enricher: CatalogEnricher<P>,
    engine: QueryEngine,
}

impl<S, P> PackagesFetcher<S, P>
where
    S: CatalogSource,
    P: MetricsProvider + 'static,
{
    pub fn new(source: S, provider: P, cache: Arc<MetricsCache>, settings: &FetcherSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(Self {
            source,
            enricher: CatalogEnricher::new(provider, cache, settings.max_concurrent_lookups, settings.lookup_timeout),
            engine: QueryEngine::new(settings.page_size, settings.case_insensitive_search)?,
        })
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<MetricsCache> {
        self.enricher.cache()
    }

    /// Fetch the catalog, enrich it, and answer `options` over the result.
    ///
    /// Only catalog failures are fatal; metrics failures show up as zero metrics.
    pub async fn fetch_packages(&self, options: &QueryOptions) -> Result<FetchResult, CatalogError> {
        let raw = self.source.list().await.inspect_err(|e| {
            log::error!(target: LOG_TARGET, "Could not load the catalog: {e}");
        })?;
        ensure_unique_names(&raw)?;

        let outcome = self.enricher.enrich(raw).await;
        let categories = summarize(&outcome.records);
        let result = self.engine.query(&outcome.records, options);

        log::debug!(
            target: LOG_TARGET,
            "Query matched {} of {} package(s), returning page {} of {}",
            result.meta.total,
            outcome.records.len(),
            result.meta.current_page,
            result.meta.pages
        );

        Ok(FetchResult {
            packages: result.packages,
            categories,
            meta: result.meta,
            degraded: outcome.degraded,
        })
    }
}

fn ensure_unique_names(records: &[RawRecord]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.name.as_str()) {
            return Err(SourceError::DuplicatePackage(record.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            category: "Database".to_string(),
            description: String::new(),
            repository: format!("acme/{name}"),
        }
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = FetcherSettings::default();
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let base = FetcherSettings::default();
        assert_eq!(FetcherSettings { page_size: 0, ..base }.validate(), Err(ConfigError::ZeroPageSize));
        assert_eq!(
            FetcherSettings {
                max_concurrent_lookups: 0,
                ..base
            }
            .validate(),
            Err(ConfigError::ZeroConcurrency)
        );
        assert_eq!(
            FetcherSettings {
                lookup_timeout: Duration::ZERO,
                ..base
            }
            .validate(),
            Err(ConfigError::ZeroLookupTimeout)
        );
    }

    #[test]
    fn duplicate_names_are_detected() {
        assert!(ensure_unique_names(&[raw("a"), raw("b")]).is_ok());
        let err = ensure_unique_names(&[raw("a"), raw("b"), raw("a")]).unwrap_err();
        assert!(matches!(err, SourceError::DuplicatePackage(name) if name == "a"));
    }

    #[test]
    fn fetch_result_serializes_without_degraded_count() {
        let result = FetchResult {
            packages: Vec::new(),
            categories: Vec::new(),
            meta: PageMeta {
                current_page: 1,
                total: 0,
                pages: 0,
            },
            degraded: 3,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"packages": [], "categories": [], "meta": {"currentPage": 1, "total": 0, "pages": 0}})
        );
    }
}
