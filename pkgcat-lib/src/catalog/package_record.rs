use super::Metrics;
use serde::{Deserialize, Serialize};

/// A catalog entry as supplied by a [`CatalogSource`](super::CatalogSource), before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Unique package name.
    pub name: String,

    /// Category label, matched exactly by queries.
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Repository identifier, either `owner/repo` or a full repository URL.
    pub repository: String,
}

/// A catalog entry merged with its popularity metrics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub name: String,
    pub category: String,
    pub description: String,
    pub repository: String,
    pub stars: u64,
    pub downloads: u64,
}

impl PackageRecord {
    #[must_use]
    pub fn from_raw(raw: RawRecord, metrics: Metrics) -> Self {
        Self {
            name: raw.name,
            category: raw.category,
            description: raw.description,
            repository: raw.repository,
            stars: metrics.stars,
            downloads: metrics.downloads,
        }
    }
}
