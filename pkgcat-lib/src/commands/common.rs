//! Setup shared by the commands that touch the catalog.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::catalog::{
    CatalogSource, FileBackend, FileSource, HostingEndpoints, HostingProvider, HttpSource, MetricsCache, PackagesFetcher, RawRecord,
    SourceError,
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use directories::BaseDirs;
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use url::Url;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                use std::io::{IsTerminal, stdout};
                stdout().is_terminal()
            }
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every command that reads the catalog
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Codeberg personal access token
    #[arg(long, value_name = "TOKEN", env = "CODEBERG_TOKEN", hide_env_values = true)]
    pub codeberg_token: Option<String>,

    /// Path to configuration file (default is `pkgcat.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Path or URL of the catalog JSON, overriding the configuration file
    #[arg(long, value_name = "PATH|URL")]
    pub catalog: Option<String>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Directory where package metrics are cached
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// Where the catalog is read from, decided at run time.
#[derive(Debug)]
pub enum ConfiguredSource {
    File(FileSource),
    Http(HttpSource),
}

impl ConfiguredSource {
    /// Anything with an `http` or `https` scheme is fetched, everything else is a file path.
    pub fn new(location: &str, config: &Config) -> Result<Self> {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Http(HttpSource::new(url, config.lookup_timeout)?)),
            _ => Ok(Self::File(FileSource::new(location))),
        }
    }
}

impl CatalogSource for ConfiguredSource {
    async fn list(&self) -> core::result::Result<Vec<RawRecord>, SourceError> {
        match self {
            Self::File(source) => source.list().await,
            Self::Http(source) => source.list().await,
        }
    }
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    pub host: &'a mut H,
    color: ColorMode,
    cache_dir: Utf8PathBuf,
    catalog: Option<String>,
    endpoints: HostingEndpoints,
}

impl<'a, H: Host> Common<'a, H> {
    /// Initialize logging and load the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or no cache directory can be determined
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
        let cache_dir = resolve_cache_dir(args.cache_dir.as_ref())?;

        let endpoints = HostingEndpoints {
            github_api_url: config.github_api_url.clone(),
            codeberg_api_url: config.codeberg_api_url.clone(),
            downloads_api_url: config.downloads_api_url.clone(),
            github_token: args.github_token.clone(),
            codeberg_token: args.codeberg_token.clone(),
            request_timeout: config.lookup_timeout,
        };

        Ok(Self {
            catalog: args.catalog.clone().or_else(|| config.catalog.clone()),
            config,
            host,
            color: args.color,
            cache_dir,
            endpoints,
        })
    }

    pub fn use_colors(&self) -> bool {
        self.color.use_colors()
    }

    /// The on-disk metrics cache for this run.
    pub fn metrics_cache(&self) -> MetricsCache {
        MetricsCache::new(FileBackend::new(self.cache_dir.join("metrics")), self.config.cache_ttl)
    }

    /// Build the pipeline described by the configuration and arguments
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is configured or the HTTP clients cannot be created
    pub fn fetcher(&self) -> Result<PackagesFetcher<ConfiguredSource, HostingProvider>> {
        let Some(location) = &self.catalog else {
            bail!("no catalog configured: pass --catalog or set `catalog` in the configuration file");
        };

        let source = ConfiguredSource::new(location, &self.config)?;
        let provider = HostingProvider::new(&self.endpoints)?;
        let fetcher = PackagesFetcher::new(source, provider, Arc::new(self.metrics_cache()), &self.config.fetcher_settings())?;

        Ok(fetcher)
    }
}

/// Use the provided path or the default cache directory for the platform
fn resolve_cache_dir(cache_dir: Option<&Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(path) = cache_dir {
        return Ok(path.clone());
    }

    let base = BaseDirs::new().into_app_err("could not determine cache directory")?;
    Utf8PathBuf::from_path_buf(base.cache_dir().join("pkgcat"))
        .map_err(|path| ohno::app_err!("cache directory '{}' is not valid UTF-8", path.display()))
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
