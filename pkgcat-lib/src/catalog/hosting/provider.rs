use super::client::{Client, DownloadsPoint, Repository};
use crate::Result;
use crate::catalog::{Metrics, MetricsProvider, PackageRef, ProviderError};
use core::time::Duration;

const LOG_TARGET: &str = "   hosting";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CODEBERG_API_URL: &str = "https://codeberg.org/api/v1";
pub const DEFAULT_DOWNLOADS_API_URL: &str = "https://api.npmjs.org";

/// Where and how to reach the supported APIs.
#[derive(Debug, Clone)]
pub struct HostingEndpoints {
    pub github_api_url: String,
    pub codeberg_api_url: String,
    pub downloads_api_url: String,
    pub github_token: Option<String>,
    pub codeberg_token: Option<String>,

    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for HostingEndpoints {
    fn default() -> Self {
        Self {
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            codeberg_api_url: DEFAULT_CODEBERG_API_URL.to_string(),
            downloads_api_url: DEFAULT_DOWNLOADS_API_URL.to_string(),
            github_token: None,
            codeberg_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// A repository host we know how to query.
#[derive(Debug, Clone)]
struct Host {
    domain: &'static str,
    client: Client,
}

/// Stars from the repository host, downloads from the package registry.
#[derive(Debug, Clone)]
pub struct HostingProvider {
    hosts: Vec<Host>,
    registry: Client,
}

impl HostingProvider {
    pub fn new(endpoints: &HostingEndpoints) -> Result<Self> {
        let timeout = endpoints.request_timeout;
        let hosts = vec![
            Host {
                domain: "github.com",
                client: Client::new(endpoints.github_token.as_deref(), &endpoints.github_api_url, "GitHub", timeout)?,
            },
            Host {
                domain: "codeberg.org",
                client: Client::new(endpoints.codeberg_token.as_deref(), &endpoints.codeberg_api_url, "Codeberg", timeout)?,
            },
        ];

        Ok(Self {
            hosts,
            registry: Client::new(None, &endpoints.downloads_api_url, "registry", timeout)?,
        })
    }

    fn client_for(&self, domain: &str) -> Option<&Client> {
        self.hosts.iter().find(|h| h.domain == domain).map(|h| &h.client)
    }

    async fn fetch_stars(client: &Client, package: &PackageRef) -> core::result::Result<u64, ProviderError> {
        let repo = package.repo();
        let repository: Repository = client.get_json(&format!("repos/{}/{}", repo.owner(), repo.repo())).await?;
        Ok(repository.stargazers_count.unwrap_or_default())
    }

    async fn fetch_downloads(&self, package: &PackageRef) -> core::result::Result<u64, ProviderError> {
        match self
            .registry
            .get_json::<DownloadsPoint>(&format!("downloads/point/last-month/{}", package.name()))
            .await
        {
            Ok(point) => Ok(point.downloads),

            // Not published to the registry yet: nothing has been downloaded
            Err(ProviderError::NotFound(url)) => {
                log::debug!(target: LOG_TARGET, "No download statistics for '{}' at '{url}'", package.name());
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}

impl MetricsProvider for HostingProvider {
    async fn fetch(&self, package: &PackageRef) -> core::result::Result<Metrics, ProviderError> {
        let host = package.repo().host();
        let client = self
            .client_for(host)
            .ok_or_else(|| ProviderError::UnsupportedHost(host.to_string()))?;

        log::debug!(target: LOG_TARGET, "Querying '{}' for {package}", client.base_url());
        let (stars, downloads) = tokio::join!(Self::fetch_stars(client, package), self.fetch_downloads(package));

        Ok(Metrics {
            stars: stars?,
            downloads: downloads?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RepoSpec;

    #[test]
    fn default_endpoints_point_at_public_apis() {
        let endpoints = HostingEndpoints::default();
        assert_eq!(endpoints.github_api_url, "https://api.github.com");
        assert_eq!(endpoints.codeberg_api_url, "https://codeberg.org/api/v1");
        assert!(endpoints.github_token.is_none());
    }

    #[test]
    fn clients_exist_for_supported_hosts_only() {
        let provider = HostingProvider::new(&HostingEndpoints::default()).unwrap();
        assert!(provider.client_for("github.com").is_some());
        assert!(provider.client_for("codeberg.org").is_some());
        assert!(provider.client_for("gitlab.com").is_none());
    }

    #[tokio::test]
    async fn unsupported_host_fails_without_network() {
        let provider = HostingProvider::new(&HostingEndpoints::default()).unwrap();
        let package = PackageRef::new("widget", RepoSpec::parse("https://gitlab.com/acme/widget").unwrap());

        let err = provider.fetch(&package).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedHost(h) if h == "gitlab.com"));
    }
}
