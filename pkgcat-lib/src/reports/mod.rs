//! Report generation for query results.
//!
//! Two generators are provided, each accessed through a `generate` function:
//! - **Console**: Terminal output with optional ANSI colors
//! - **JSON**: Machine-readable `{ packages, categories, meta }`
//!
//! Category listings have their own console generator since they don't carry
//! any package data.

mod common;
mod console;
mod json;

pub use console::generate as generate_console;
pub use console::generate_categories as generate_console_categories;
pub use json::generate as generate_json;
