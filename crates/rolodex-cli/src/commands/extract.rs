//! Extract command implementation.

use super::extract_page;
use crate::cli::PageArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the extract command.
pub async fn execute_extract(args: PageArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let record = extract_page(&args.source(), config).await?;
    if record.is_blank() {
        eprintln!(
            "{}",
            formatter.warning("Nothing found on the page; is it a saved profile?")
        );
    }
    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
