use crate::Result;
use crate::catalog::FetchResult;
use core::fmt::Write;

pub fn generate<W: Write>(result: &FetchResult, writer: &mut W) -> Result<()> {
    write!(writer, "{}", serde_json::to_string_pretty(result)?)?;
    Ok(())
}
