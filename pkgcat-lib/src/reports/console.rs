use super::common::format_count;
use crate::Result;
use crate::catalog::{CategorySummary, FetchResult};
use core::fmt::Write;
use owo_colors::OwoColorize;

pub fn generate<W: Write>(result: &FetchResult, use_colors: bool, writer: &mut W) -> Result<()> {
    if result.packages.is_empty() {
        if result.meta.total == 0 {
            writeln!(writer, "No packages matched")?;
        } else {
            writeln!(
                writer,
                "Page {} is empty; there are {} page(s) of results",
                result.meta.current_page, result.meta.pages
            )?;
        }
        return Ok(());
    }

    let name_width = result.packages.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let category_width = result.packages.iter().map(|p| p.category.len()).max().unwrap_or(0);

    for package in &result.packages {
        let name = format!("{:<name_width$}", package.name);
        let category = format!("{:<category_width$}", package.category);
        let stars = format!("★ {:>9}", format_count(package.stars));
        let downloads = format!("↓ {:>11}", format_count(package.downloads));

        if use_colors {
            writeln!(writer, "{}  {}  {}  {}", name.bold(), category.cyan(), stars.yellow(), downloads.green())?;
        } else {
            writeln!(writer, "{name}  {category}  {stars}  {downloads}")?;
        }

        if !package.description.is_empty() {
            writeln!(writer, "    {}", package.description)?;
        }
    }

    writeln!(writer)?;
    let footer = format!(
        "Page {} of {} ({} package(s) matched)",
        result.meta.current_page, result.meta.pages, result.meta.total
    );
    if use_colors {
        writeln!(writer, "{}", footer.dimmed())?;
    } else {
        writeln!(writer, "{footer}")?;
    }

    Ok(())
}

pub fn generate_categories<W: Write>(categories: &[CategorySummary], use_colors: bool, writer: &mut W) -> Result<()> {
    let label_width = categories.iter().map(|c| c.label.len()).max().unwrap_or(0);

    for summary in categories {
        let label = format!("{:<label_width$}", summary.label);
        if use_colors {
            writeln!(writer, "{}  {:>5}", label.cyan(), summary.count)?;
        } else {
            writeln!(writer, "{label}  {:>5}", summary.count)?;
        }
    }

    Ok(())
}
