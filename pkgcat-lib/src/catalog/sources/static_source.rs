use super::CatalogSource;
use crate::catalog::{RawRecord, SourceError};
use std::sync::Arc;

/// A catalog held in memory, typically injected by tests or embedding code.
///
/// Unlike the file and HTTP sources, an empty list is returned as-is.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Arc<[RawRecord]>,
}

impl StaticSource {
    #[must_use]
    pub fn new(records: impl Into<Arc<[RawRecord]>>) -> Self {
        Self { records: records.into() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CatalogSource for StaticSource {
    async fn list(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self.records.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            category: "Database".to_string(),
            description: String::new(),
            repository: format!("acme/{name}"),
        }
    }

    #[tokio::test]
    async fn lists_records_in_order() {
        let source = StaticSource::new(vec![record("a"), record("b")]);
        let names: Vec<_> = source.list().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn empty_source_is_allowed() {
        let source = StaticSource::default();
        assert!(source.is_empty());
        assert!(source.list().await.unwrap().is_empty());
    }
}
