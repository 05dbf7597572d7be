//! Minimal JSON-over-HTTP client shared by the hosting and registry endpoints.

use crate::Result;
use crate::catalog::ProviderError;
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("pkgcat/", env!("CARGO_PKG_VERSION"));

/// Repository fields we read from GitHub and Codeberg.
#[derive(Debug, Deserialize)]
pub struct Repository {
    /// Codeberg reports this as `stars_count`
    #[serde(alias = "stars_count", default)]
    pub stargazers_count: Option<u64>,
}

/// Body of a registry `downloads/point` response.
#[derive(Debug, Deserialize)]
pub struct DownloadsPoint {
    #[serde(default)]
    pub downloads: u64,
}

/// A client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    display_name: &'static str,
}

impl Client {
    /// Create a client with an optional bearer token.
    pub fn new(token: Option<&str>, base_url: &str, display_name: &'static str, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT).timeout(timeout);

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("Bearer {t}"))?;
            auth_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(AUTHORIZATION, auth_val);
            builder = builder.default_headers(headers);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            display_name,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}/{path}` and decode the JSON body.
    ///
    /// 403 and 429 are reported as rate limiting, 404 as not found; any other
    /// unsuccessful status is a plain status failure.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> core::result::Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ProviderError::Network { url: url.clone(), source })?;

        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.map_err(|source| ProviderError::Decode { url, source });
        }

        Err(match status {
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
                host: self.display_name.to_string(),
                reset_at: rate_limit_reset(resp.headers()),
            },
            StatusCode::NOT_FOUND => ProviderError::NotFound(url),
            _ => ProviderError::Status {
                url,
                status: status.as_u16(),
            },
        })
    }
}

/// Reads the `x-ratelimit-reset` header (Unix seconds).
fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;
    DateTime::from_timestamp(reset_timestamp, 0)
}
