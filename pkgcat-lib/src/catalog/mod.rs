//! The package catalog pipeline.
//!
//! A [`CatalogSource`] supplies raw records, the [`CatalogEnricher`] merges in
//! popularity metrics through a shared [`MetricsCache`], and the
//! [`PackagesFetcher`] summarizes categories and answers [`QueryOptions`] over
//! the enriched set.

mod aggregator;
mod cache;
mod enricher;
mod error;
mod fetcher;
mod hosting;
mod metrics;
mod package_record;
mod provider;
mod query;
mod repo_spec;
mod sources;
mod throttler;

pub use aggregator::{CategorySummary, summarize};
pub use cache::{CacheBackend, DEFAULT_CACHE_TTL, FileBackend, Lookup, MemoryBackend, MetricsCache};
pub use enricher::{CatalogEnricher, EnrichOutcome, MAX_RATE_LIMIT_PAUSE};
pub use error::{CatalogError, ConfigError, ProviderError, SourceError};
pub use fetcher::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CONCURRENT_LOOKUPS, FetchResult, FetcherSettings, PackagesFetcher};
pub use hosting::{DEFAULT_CODEBERG_API_URL, DEFAULT_DOWNLOADS_API_URL, DEFAULT_GITHUB_API_URL, HostingEndpoints, HostingProvider};
pub use metrics::Metrics;
pub use package_record::{PackageRecord, RawRecord};
pub use provider::{MetricsProvider, PackageRef, Timed};
pub use query::{DEFAULT_PAGE_SIZE, PageMeta, QueryEngine, QueryOptions, QueryResult, SortField};
pub use repo_spec::{DEFAULT_HOST, RepoSpec};
pub use sources::{CatalogSource, FileSource, HttpSource, StaticSource};
pub use throttler::Throttler;
