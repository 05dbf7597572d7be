//! Popularity metrics from repository hosts and the package registry.

mod client;
mod provider;

pub use provider::{DEFAULT_CODEBERG_API_URL, DEFAULT_DOWNLOADS_API_URL, DEFAULT_GITHUB_API_URL, HostingEndpoints, HostingProvider};
