use super::{Metrics, ProviderError, RepoSpec};
use core::fmt::{Display, Formatter};
use core::time::Duration;
use std::sync::Arc;

/// Identifies the package whose metrics are being looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    name: Arc<str>,
    repo: RepoSpec,
}

impl PackageRef {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, repo: RepoSpec) -> Self {
        Self { name: name.into(), repo }
    }

    /// Registry name of the package, used for download counts.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn repo(&self) -> &RepoSpec {
        &self.repo
    }

    /// Key under which this package's metrics are cached, `host/owner/repo#name`.
    ///
    /// Downloads are counted per package, so packages published from one
    /// repository still get separate entries.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}#{}", self.repo.cache_key(), self.name)
    }
}

impl Display for PackageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name, self.repo.cache_key())
    }
}

/// Source of popularity metrics.
///
/// Implementations perform a single attempt per call. Retrying, throttling and
/// caching are the caller's business.
pub trait MetricsProvider: Send + Sync {
    fn fetch(&self, package: &PackageRef) -> impl Future<Output = Result<Metrics, ProviderError>> + Send;
}

impl<P: MetricsProvider> MetricsProvider for Arc<P> {
    fn fetch(&self, package: &PackageRef) -> impl Future<Output = Result<Metrics, ProviderError>> + Send {
        (**self).fetch(package)
    }
}

/// Bounds every lookup of the wrapped provider by a deadline.
#[derive(Debug, Clone)]
pub struct Timed<P> {
    inner: P,
    timeout: Duration,
}

impl<P> Timed<P> {
    pub const fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<P: MetricsProvider> MetricsProvider for Timed<P> {
    async fn fetch(&self, package: &PackageRef) -> Result<Metrics, ProviderError> {
        tokio::time::timeout(self.timeout, self.inner.fetch(package))
            .await
            .unwrap_or(Err(ProviderError::Timeout(self.timeout)))
    }
}
