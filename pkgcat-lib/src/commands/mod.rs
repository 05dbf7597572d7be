//! Command-line interface for pkgcat
//!
//! Each subcommand lives in its own module and follows the same pattern:
//!
//! 1. Parse arguments and load configuration (`common`, `config`)
//! 2. Build a [`PackagesFetcher`](crate::catalog::PackagesFetcher) over the configured
//!    catalog, the hosting APIs, and the on-disk metrics cache
//! 3. Run a query and render the result with one of the report generators
//!
//! Configuration lives in a TOML file (`pkgcat.toml` by default) whose keys all
//! have defaults embedded from `default_config.toml`.

mod categories;
mod clear_cache;
mod common;
mod config;
mod host;
mod init;
mod list;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use categories::{CategoriesArgs, list_categories};
pub use clear_cache::{ClearCacheArgs, clear_cache};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use list::{ListArgs, list_packages};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
