//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings needed for the operation are missing
    #[error("{0}")]
    NotConfigured(String),

    /// Extraction error
    #[error("Extractor error: {0}")]
    Extractor(#[from] rolodex_extractor::ExtractorError),

    /// Spreadsheet error
    #[error("{0}")]
    Sheets(#[from] rolodex_sheets::SheetsError),

    /// AI provider error
    #[error("{0}")]
    Llm(#[from] rolodex_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The profile is already in the sheet and no update was requested
    #[error("Profile already saved on {saved_date} (row {row_number}); use --update to overwrite it")]
    AlreadySaved {
        /// Existing row
        row_number: usize,
        /// Date it was saved
        saved_date: String,
    },
}
