//! Command dispatch logic for pkgcat

use super::{
    CategoriesArgs, ClearCacheArgs, InitArgs, ListArgs, ValidateArgs, clear_cache, init_config, list_categories, list_packages,
    validate_config,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "pkgcat", author, version, long_about = None)]
#[command(about = "Browse a package catalog enriched with stars and download counts")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PkgcatSubcommand,
}

#[derive(Subcommand, Debug)]
enum PkgcatSubcommand {
    /// List packages, optionally filtered, searched, sorted and paged
    List(Box<ListArgs>),
    /// Show how many packages each category holds
    Categories(Box<CategoriesArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// Remove cached package metrics
    ClearCache(Box<ClearCacheArgs>),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        PkgcatSubcommand::List(list_args) => list_packages(host, list_args).await,
        PkgcatSubcommand::Categories(categories_args) => list_categories(host, categories_args).await,
        PkgcatSubcommand::Init(init_args) => init_config(host, init_args),
        PkgcatSubcommand::Validate(validate_args) => validate_config(host, validate_args),
        PkgcatSubcommand::ClearCache(clear_args) => clear_cache(host, clear_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_options() {
        let cli = Cli::parse_from(["pkgcat", "list", "--category", "Database", "--sort", "stars", "--page", "2", "--catalog", "p.json"]);
        let PkgcatSubcommand::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.category.as_deref(), Some("Database"));
        assert_eq!(args.page, 2);
        assert_eq!(args.common.catalog.as_deref(), Some("p.json"));
    }
}
