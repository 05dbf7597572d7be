use super::{CatalogSource, parse_records};
use crate::Result;
use crate::catalog::{RawRecord, SourceError};
use core::time::Duration;
use url::Url;

const LOG_TARGET: &str = "    source";

/// A catalog served as a JSON array over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pkgcat/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl CatalogSource for HttpSource {
    async fn list(&self) -> core::result::Result<Vec<RawRecord>, SourceError> {
        log::info!(target: LOG_TARGET, "Downloading catalog from {}", self.url);

        let url = self.url.to_string();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Http { url: url.clone(), source })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SourceError::Http { url: url.clone(), source })?;

        parse_records(&bytes, &url)
    }
}
