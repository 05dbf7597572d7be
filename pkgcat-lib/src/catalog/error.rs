//! Error taxonomy for the catalog pipeline.
//!
//! Only [`SourceError`] and [`ConfigError`] ever reach callers of
//! [`PackagesFetcher::fetch_packages`](super::PackagesFetcher::fetch_packages).
//! A [`ProviderError`] is always absorbed by the enricher and turned into
//! zero metrics for the affected record.

use chrono::{DateTime, Utc};
use core::time::Duration;
use std::path::PathBuf;
use thiserror::Error;

/// The raw catalog could not be obtained or is unusable.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading catalog file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching catalog from '{url}'")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog endpoint '{url}' responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("parsing catalog from '{origin}'")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog from '{origin}' contains no packages")]
    Empty { origin: String },

    #[error("catalog lists package '{0}' more than once")]
    DuplicatePackage(String),
}

/// A single metrics lookup failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid repository identifier '{identifier}': {reason}")]
    InvalidRepository { identifier: String, reason: String },

    #[error("unsupported hosting provider '{0}'")]
    UnsupportedHost(String),

    #[error("request to '{url}' failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{url}' responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("'{0}' was not found")]
    NotFound(String),

    #[error("rate limited by {host}")]
    RateLimited { host: String, reset_at: Option<DateTime<Utc>> },

    #[error("decoding response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("lookup task failed: {0}")]
    Task(String),
}

impl ProviderError {
    /// The time at which a rate limit lifts, if this error reports one.
    #[must_use]
    pub const fn rate_limit_reset(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::RateLimited { reset_at, .. } => *reset_at,
            _ => None,
        }
    }
}

/// An option or configuration value was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown query option '{0}' (expected one of: category, search, sort, page)")]
    UnknownOption(String),

    #[error("unsupported sort field '{0}'")]
    UnsupportedSort(String),

    #[error("invalid page '{value}': {source}")]
    InvalidPage {
        value: String,
        #[source]
        source: core::num::ParseIntError,
    },

    #[error("malformed query option '{0}': expected key=value")]
    MalformedOption(String),

    #[error("query options must be a JSON object: {0}")]
    InvalidJson(String),

    #[error("page_size must be greater than zero")]
    ZeroPageSize,

    #[error("max_concurrent_lookups must be greater than zero")]
    ZeroConcurrency,

    #[error("lookup_timeout must be greater than zero")]
    ZeroLookupTimeout,
}

/// Failure of a whole `fetch_packages` call.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
