//! Where the raw, unenriched catalog comes from.

mod file_source;
mod http_source;
mod static_source;

pub use file_source::FileSource;
pub use http_source::HttpSource;
pub use static_source::StaticSource;

use super::{RawRecord, SourceError};

/// Supplies the raw package list.
///
/// Each call returns a fresh snapshot; nothing is cached at this level.
pub trait CatalogSource: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<RawRecord>, SourceError>> + Send;
}

/// Decode a JSON array of records, rejecting an empty catalog.
fn parse_records(bytes: &[u8], origin: &str) -> Result<Vec<RawRecord>, SourceError> {
    let records: Vec<RawRecord> = serde_json::from_slice(bytes).map_err(|source| SourceError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    if records.is_empty() {
        return Err(SourceError::Empty {
            origin: origin.to_string(),
        });
    }

    Ok(records)
}
