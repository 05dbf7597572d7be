use super::{CatalogSource, parse_records};
use crate::catalog::{RawRecord, SourceError};
use std::path::PathBuf;

const LOG_TARGET: &str = "    source";

/// A catalog stored as a JSON array on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileSource {
    async fn list(&self) -> Result<Vec<RawRecord>, SourceError> {
        log::debug!(target: LOG_TARGET, "Reading catalog from '{}'", self.path.display());

        let bytes = tokio::fs::read(&self.path).await.map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        parse_records(&bytes, &self.path.display().to_string())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    async fn reads_catalog_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("packages.json");
        std::fs::write(
            &path,
            r#"[{"name": "adonis-acl", "category": "Authentication", "description": "ACL", "repository": "enniel/adonis-acl"}]"#,
        )
        .unwrap();

        let records = FileSource::new(&path).list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Authentication");
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    async fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = FileSource::new(tmp.path().join("nope.json")).list().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    async fn empty_file_catalog_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("packages.json");
        std::fs::write(&path, "[]").unwrap();

        let err = FileSource::new(&path).list().await.unwrap_err();
        assert!(matches!(err, SourceError::Empty { .. }));
    }
}
