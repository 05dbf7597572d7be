use crate::Result;
use crate::catalog::FetcherSettings;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pkgcat.toml";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of packages per page of results
    pub page_size: usize,

    /// How long fetched stars and download counts are reused before asking again
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Upper bound on simultaneous metrics lookups
    pub max_concurrent_lookups: usize,

    /// Time allowed for a single metrics lookup
    #[serde(with = "humantime_serde")]
    pub lookup_timeout: Duration,

    /// Whether name searches ignore case
    pub case_insensitive_search: bool,

    /// Path or URL of the catalog JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    pub github_api_url: String,
    pub codeberg_api_url: String,
    pub downloads_api_url: String,
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_path: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading pkgcat configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_path.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading pkgcat configuration file '{path}'")),
            }
        };

        let config = Self::parse(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Overlay the keys present in `text` on top of the defaults.
    fn parse(text: &str) -> core::result::Result<Self, toml::de::Error> {
        let mut merged: toml::Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let overrides: toml::Table = toml::from_str(text)?;
        merged.extend(overrides);
        merged.try_into()
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    #[must_use]
    pub const fn fetcher_settings(&self) -> FetcherSettings {
        FetcherSettings {
            page_size: self.page_size,
            case_insensitive_search: self.case_insensitive_search,
            max_concurrent_lookups: self.max_concurrent_lookups,
            lookup_timeout: self.lookup_timeout,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a setting is out of range or an API URL is malformed
    pub fn validate(&self) -> Result<()> {
        self.fetcher_settings().validate()?;

        if self.cache_ttl.is_zero() {
            return Err(app_err!("cache_ttl must be greater than zero"));
        }

        for (key, value) in [
            ("github_api_url", &self.github_api_url),
            ("codeberg_api_url", &self.codeberg_api_url),
            ("downloads_api_url", &self.downloads_api_url),
        ] {
            let _ = Url::parse(value).into_app_err_with(|| format!("{key} is not a valid URL: '{value}'"))?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
