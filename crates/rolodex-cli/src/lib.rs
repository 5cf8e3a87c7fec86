//! Rolodex CLI library.
//!
//! Loads saved profile pages, extracts their records, and saves them to a
//! Google Sheet, optionally with an AI-suggested networking note. The
//! [`relay`] module answers the same operations as JSON messages.

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod page;
pub mod relay;

pub use cli::{Cli, Command};
pub use config::Config;
pub use controller::{Controller, SaveOutcome};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use relay::Relay;
