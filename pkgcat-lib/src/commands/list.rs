use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::catalog::{FetchResult, QueryOptions, SortField};
use crate::reports::{generate_console, generate_json};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only show packages in this category (exact match)
    #[arg(long, value_name = "LABEL")]
    pub category: Option<String>,

    /// Only show packages whose name contains this text
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Order packages by this field, highest first
    #[arg(long, value_name = "FIELD", value_parser = parse_sort)]
    pub sort: Option<SortField>,

    /// Page of results to show, starting at 1
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Write the result as JSON to this file instead of printing it
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

fn parse_sort(value: &str) -> core::result::Result<SortField, String> {
    value.parse().map_err(|e: strum::ParseError| {
        format!(
            "unsupported sort field '{value}': {e} (expected one of: {})",
            <SortField as strum::VariantNames>::VARIANTS.join(", ")
        )
    })
}

impl ListArgs {
    fn query_options(&self) -> QueryOptions {
        QueryOptions {
            category: self.category.clone(),
            search: self.search.clone(),
            sort: self.sort,
            page: Some(self.page),
        }
    }
}

pub async fn list_packages<H: Host>(host: &mut H, args: &ListArgs) -> Result<()> {
    let common = Common::new(host, &args.common)?;
    let fetcher = common.fetcher()?;

    let result = fetcher.fetch_packages(&args.query_options()).await?;
    report(common, &result, args.json.as_ref())
}

fn report<H: Host>(common: Common<'_, H>, result: &FetchResult, json: Option<&Utf8PathBuf>) -> Result<()> {
    let use_colors = common.use_colors();
    let host = common.host;

    if result.degraded > 0 {
        let _ = writeln!(
            host.error(),
            "warning: {} package(s) are shown with zero stars and downloads because their metrics could not be fetched",
            result.degraded
        );
    }

    if let Some(filename) = json {
        let mut json_output = String::new();
        generate_json(result, &mut json_output)?;
        fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
        return Ok(());
    }

    let mut console_output = String::new();
    generate_console(result, use_colors, &mut console_output)?;
    let _ = write!(host.output(), "{console_output}");
    Ok(())
}
