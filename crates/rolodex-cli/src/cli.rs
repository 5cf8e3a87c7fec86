//! CLI command definitions and argument parsing.

use crate::page::PageSource;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rolodex - Save profile pages to a Google Sheet.
#[derive(Debug, Parser)]
#[command(name = "rolodex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ROLODEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (profile URL only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a saved profile page and print the record
    Extract(PageArgs),

    /// Extract a profile page and save it to the sheet
    Save(SaveArgs),

    /// Suggest a networking note for a profile page
    Note(PageArgs),

    /// Authorize access to Google Sheets
    Auth(AuthArgs),

    /// Show or change settings
    Settings(SettingsArgs),

    /// Review a profile interactively before saving
    Review(PageArgs),

    /// Answer JSON messages on stdin, one per line
    Serve(ServeArgs),
}

/// A saved profile page.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Saved page markup
    pub html: PathBuf,

    /// Address the page was saved from
    #[arg(short, long)]
    pub url: String,

    /// Contact overlay markup, inserted when the contact link is activated
    #[arg(short, long)]
    pub overlay: Option<PathBuf>,
}

impl PageArgs {
    /// Where to load the page from
    pub fn source(&self) -> PageSource {
        PageSource {
            url: self.url.clone(),
            html: self.html.clone(),
            overlay: self.overlay.clone(),
        }
    }
}

/// Arguments for the save command.
#[derive(Debug, Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Notes for the row (skips the AI suggestion)
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Overwrite the existing row when the profile was saved before
    #[arg(long)]
    pub update: bool,

    /// Do not ask the AI for a note
    #[arg(long)]
    pub no_ai: bool,
}

/// Arguments for the auth command.
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// URL the browser was redirected to after consent
    #[arg(short, long)]
    pub redirect: Option<String>,
}

/// Arguments for settings management.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Change settings
    Set {
        /// OAuth client id
        #[arg(long)]
        client_id: Option<String>,
        /// Spreadsheet id
        #[arg(long)]
        sheet_id: Option<String>,
        /// Tab name
        #[arg(long)]
        sheet_name: Option<String>,
        /// Gemini API key
        #[arg(long)]
        gemini_key: Option<String>,
        /// A few words about yourself for note suggestions
        #[arg(long)]
        background: Option<String>,
        /// Redirect URI registered for the OAuth client
        #[arg(long)]
        redirect_uri: Option<String>,
    },
}

/// Arguments for the serve command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Saved page markup answering `extractProfile`
    #[arg(long, requires = "url")]
    pub html: Option<PathBuf>,

    /// Address the page was saved from
    #[arg(short, long)]
    pub url: Option<String>,

    /// Contact overlay markup
    #[arg(short, long)]
    pub overlay: Option<PathBuf>,
}

impl ServeArgs {
    /// Page to serve, when one was given
    pub fn source(&self) -> Option<PageSource> {
        let html = self.html.clone()?;
        Some(PageSource {
            url: self.url.clone().unwrap_or_default(),
            html,
            overlay: self.overlay.clone(),
        })
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
