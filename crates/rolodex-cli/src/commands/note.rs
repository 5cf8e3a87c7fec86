//! Note command implementation.

use super::extract_page;
use crate::cli::PageArgs;
use crate::config::{Config, OutputFormat};
use crate::controller::Controller;
use crate::error::Result;
use crate::output::Formatter;
use serde_json::json;

/// Execute the note command.
pub async fn execute_note(args: PageArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let record = extract_page(&args.source(), config).await?;
    let controller = Controller::from_config(config)?;
    let note = controller.require_note(&record).await?;

    match formatter.format() {
        OutputFormat::Json => {
            let output = json!({ "profileUrl": record.profile_url, "note": note });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table | OutputFormat::Quiet => println!("{}", note),
    }
    Ok(())
}
