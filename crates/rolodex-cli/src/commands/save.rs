//! Save command implementation.

use super::extract_page;
use crate::cli::SaveArgs;
use crate::config::Config;
use crate::controller::{Controller, SaveOutcome};
use crate::error::Result;
use crate::output::Formatter;
use tracing::warn;

/// Execute the save command.
pub async fn execute_save(args: SaveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    config.require_ready_to_save()?;

    let mut record = extract_page(&args.page.source(), config).await?;
    let controller = Controller::from_config(config)?;

    record.notes = match args.notes {
        Some(notes) => notes,
        None if args.no_ai => String::new(),
        None => match controller.suggest_note(&record).await {
            Ok(note) => note.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Note suggestion failed");
                eprintln!(
                    "{}",
                    formatter.warning(&format!("Saving without a note: {}", e))
                );
                String::new()
            }
        },
    };

    let name = record.name.clone();
    match controller.save(record, args.update).await? {
        SaveOutcome::Appended => {
            println!("{}", formatter.success(&format!("Saved {} to the sheet", name)));
        }
        SaveOutcome::Updated { row_number } => {
            println!(
                "{}",
                formatter.success(&format!("Updated {} (row {})", name, row_number))
            );
        }
    }
    Ok(())
}
