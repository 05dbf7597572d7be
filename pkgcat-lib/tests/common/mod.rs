//! Shared fakes for the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset of these helpers")]

use pkgcat_lib::catalog::{Metrics, MetricsProvider, PackageRef, ProviderError, RawRecord};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A deterministic provider that never goes near the network.
///
/// Every package gets at least 200 stars and 20,000 downloads; the exact
/// values derive from the package name so repeated lookups agree.
#[derive(Debug, Default)]
pub struct FakeProvider {
    calls: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make lookups for `name` fail until further notice.
    pub fn fail_for(&self, name: &str) {
        let _ = self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn metrics_for(name: &str) -> Metrics {
        let seed = name.bytes().fold(0_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
        Metrics {
            stars: 200 + seed % 5_000,
            downloads: 20_000 + seed % 1_000_000,
        }
    }
}

impl MetricsProvider for FakeProvider {
    async fn fetch(&self, package: &PackageRef) -> Result<Metrics, ProviderError> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(package.name()) {
            return Err(ProviderError::Status {
                url: format!("https://api.github.com/repos/{}", package.repo().cache_key()),
                status: 500,
            });
        }
        Ok(Self::metrics_for(package.name()))
    }
}

/// A raw record whose repository is `acme/<name>` on GitHub.
pub fn record(name: &str, category: &str) -> RawRecord {
    RawRecord {
        name: name.to_string(),
        category: category.to_string(),
        description: format!("The {name} package"),
        repository: format!("acme/{name}"),
    }
}

/// `count` records named `adonis-0`, `adonis-1`, ... in one category.
pub fn numbered(count: usize, category: &str) -> Vec<RawRecord> {
    (0..count).map(|i| record(&format!("adonis-{i}"), category)).collect()
}

/// Three "Database" and two "Authentication" records.
pub fn small_catalog() -> Vec<RawRecord> {
    vec![
        record("adonis-lucid", "Database"),
        record("adonis-auth", "Authentication"),
        record("adonis-redis", "Database"),
        record("adonis-acl", "Authentication"),
        record("adonis-mongoose", "Database"),
    ]
}
