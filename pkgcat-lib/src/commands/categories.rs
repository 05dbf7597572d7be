use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::catalog::QueryOptions;
use crate::reports::generate_console_categories;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn list_categories<H: Host>(host: &mut H, args: &CategoriesArgs) -> Result<()> {
    let common = Common::new(host, &args.common)?;
    let fetcher = common.fetcher()?;

    let result = fetcher.fetch_packages(&QueryOptions::default()).await?;

    let mut output = String::new();
    let use_colors = common.use_colors();
    generate_console_categories(&result.categories, use_colors, &mut output)?;
    let _ = write!(common.host.output(), "{output}");
    Ok(())
}
