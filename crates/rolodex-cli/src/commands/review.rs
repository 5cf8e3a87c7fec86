//! Review command: an interactive session over one extracted profile.

use super::extract_page;
use crate::cli::PageArgs;
use crate::config::Config;
use crate::controller::{Controller, SaveOutcome};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rolodex_domain::ProfileRecord;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Session input.
#[derive(Debug, PartialEq, Eq)]
enum ReviewCommand {
    Show,
    Notes(String),
    Suggest,
    Save { update: bool },
    Help,
    Quit,
}

/// Execute the review command.
pub async fn execute_review(args: PageArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut record = extract_page(&args.source(), config).await?;
    let controller = Controller::from_config(config)?;

    println!("{}", formatter.format_record(&record)?);
    if let Some(found) = controller.check_duplicate(&record.profile_url).await {
        println!("{}", formatter.duplicate(&found));
        println!("{}", formatter.info("Use 'update' to overwrite that row"));
    }
    if controller.can_suggest_notes() {
        suggest_into(&controller, &mut record, formatter).await;
    }
    println!("{}", formatter.info("Type 'help' for commands, 'quit' to leave"));

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;
    let history_path = history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let line = match editor.readline("review> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'quit' to leave"));
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line).ok();

        let command = match parse_review_command(line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", formatter.error(&e.to_string()));
                continue;
            }
        };

        match command {
            ReviewCommand::Show => println!("{}", formatter.format_record(&record)?),
            ReviewCommand::Notes(notes) => {
                record.notes = notes;
                println!("{}", formatter.success("Notes updated"));
            }
            ReviewCommand::Suggest => {
                if controller.can_suggest_notes() {
                    suggest_into(&controller, &mut record, formatter).await;
                } else {
                    eprintln!("{}", formatter.error("Gemini API key not configured"));
                }
            }
            ReviewCommand::Save { update } => {
                let saved = match config.require_ready_to_save() {
                    Ok(()) => controller.save(record.clone(), update).await,
                    Err(e) => Err(e),
                };
                match saved {
                    Ok(SaveOutcome::Appended) => {
                        println!("{}", formatter.success("Saved to the sheet"));
                        break;
                    }
                    Ok(SaveOutcome::Updated { row_number }) => {
                        println!(
                            "{}",
                            formatter.success(&format!("Updated row {}", row_number))
                        );
                        break;
                    }
                    Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                }
            }
            ReviewCommand::Help => print_help(),
            ReviewCommand::Quit => break,
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

/// Replace the record's notes with a fresh suggestion; failures are reported, not fatal.
async fn suggest_into<S, L>(
    controller: &Controller<S, L>,
    record: &mut ProfileRecord,
    formatter: &Formatter,
) where
    S: rolodex_domain::ProfileStore<Error = rolodex_sheets::SheetsError>,
    L: rolodex_domain::LlmProvider<Error = rolodex_llm::LlmError>,
{
    println!("{}", formatter.info("Generating note..."));
    match controller.suggest_note(record).await {
        Ok(Some(note)) => {
            println!("Suggested note: {}", note);
            record.notes = note;
        }
        Ok(None) => {}
        Err(e) => eprintln!("{}", formatter.error(&format!("Error: {}", e))),
    }
}

fn parse_review_command(line: &str) -> Result<ReviewCommand> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "show" | "s" => Ok(ReviewCommand::Show),
        "notes" => Ok(ReviewCommand::Notes(rest.to_string())),
        "note" | "suggest" => Ok(ReviewCommand::Suggest),
        "save" => Ok(ReviewCommand::Save { update: false }),
        "update" => Ok(ReviewCommand::Save { update: true }),
        "help" | "?" => Ok(ReviewCommand::Help),
        "quit" | "exit" | "q" => Ok(ReviewCommand::Quit),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            word
        ))),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  show            Show the record");
    println!("  notes <text>    Set the notes (empty clears them)");
    println!("  note            Suggest notes with Gemini");
    println!("  save            Save as a new row");
    println!("  update          Save, overwriting the existing row");
    println!("  quit            Leave without saving");
}

fn history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".rolodex").join("review_history"))
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to initialize editor: {}", e),
    ))
}
