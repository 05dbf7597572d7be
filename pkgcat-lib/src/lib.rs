#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for pkgcat
//!
//! pkgcat lists the packages of an ecosystem catalog together with their
//! popularity (repository stars and registry downloads), and lets callers
//! filter, search, sort and page through them.
//!
//! # Module Organization
//!
//! - [`catalog`]: The fetch, enrich, aggregate and query pipeline
//! - [`commands`]: Command-line interface and orchestration
//! - [`reports`]: Console and JSON rendering of query results

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod catalog;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
