use super::ProviderError;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use std::sync::Arc;
use url::Url;

/// Host assumed for `owner/repo` shorthand identifiers.
pub const DEFAULT_HOST: &str = "github.com";

/// A repository identifier normalized to `host/owner/repo`.
///
/// Accepts both the `owner/repo` shorthand and full repository URLs; any path
/// beyond the repository name and a trailing `.git` are dropped, so that
/// different spellings of the same repository compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    host: Arc<str>,
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoSpec {
    pub fn parse(identifier: &str) -> Result<Self, ProviderError> {
        let identifier = identifier.trim();
        let invalid = |reason: &str| ProviderError::InvalidRepository {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        if identifier.is_empty() {
            return Err(invalid("empty identifier"));
        }

        let (host, segments) = if identifier.contains("://") {
            let url = Url::parse(identifier).map_err(|e| invalid(&e.to_string()))?;
            let host = url.host_str().ok_or_else(|| invalid("missing host"))?.to_ascii_lowercase();
            let segments: Vec<String> = url
                .path_segments()
                .map(|segments| segments.map(str::to_string).collect())
                .unwrap_or_default();
            (host, segments)
        } else {
            let segments = identifier.split('/').map(str::to_string).collect();
            (DEFAULT_HOST.to_string(), segments)
        };

        if segments.len() < 2 {
            return Err(invalid("expected owner/repo"));
        }

        let owner = segments[0].as_str();
        let repo = segments[1].trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() {
            return Err(invalid("empty owner or repo name"));
        }

        Ok(Self {
            host: Arc::from(host),
            owner: Arc::from(owner),
            repo: Arc::from(repo),
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Key under which metrics for this repository are cached.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.host, self.owner, self.repo)
    }
}

impl FromStr for RepoSpec {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "https://{}/{}/{}", self.host, self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shorthand_defaults_to_github() {
        let spec = RepoSpec::parse("adonisjs/lucid").unwrap();

        assert_eq!(spec.host(), "github.com");
        assert_eq!(spec.owner(), "adonisjs");
        assert_eq!(spec.repo(), "lucid");
        assert_eq!(spec.cache_key(), "github.com/adonisjs/lucid");
    }

    #[test]
    fn test_parse_github_url() {
        let spec = RepoSpec::parse("https://github.com/tokio-rs/tokio").unwrap();

        assert_eq!(spec.host(), "github.com");
        assert_eq!(spec.owner(), "tokio-rs");
        assert_eq!(spec.repo(), "tokio");
    }

    #[test]
    fn test_parse_codeberg_url() {
        let spec = RepoSpec::parse("https://codeberg.org/msrd0/cargo-doc2readme").unwrap();

        assert_eq!(spec.host(), "codeberg.org");
        assert_eq!(spec.cache_key(), "codeberg.org/msrd0/cargo-doc2readme");
    }

    #[test]
    fn test_git_extension_and_deep_path_stripped() {
        let spec = RepoSpec::parse("https://github.com/serde-rs/serde.git/tree/master/serde_derive").unwrap();

        assert_eq!(spec.repo(), "serde");
        assert_eq!(spec.to_string(), "https://github.com/serde-rs/serde");
    }

    #[test]
    fn test_shorthand_and_url_are_equal() {
        let short = RepoSpec::parse("adonisjs/lucid").unwrap();
        let long = RepoSpec::parse("https://GitHub.com/adonisjs/lucid.git").unwrap();

        assert_eq!(short, long);
    }

    #[test]
    fn test_invalid_identifiers() {
        for identifier in ["", "   ", "lucid", "/lucid", "adonisjs/", "https://github.com/", "https://github.com/adonisjs"] {
            let err = RepoSpec::parse(identifier).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidRepository { .. }), "{identifier:?} gave {err:?}");
        }
    }

    #[test]
    fn test_from_str() {
        let spec: RepoSpec = "acme/widgets".parse().unwrap();
        assert_eq!(spec.repo(), "widgets");
    }
}
