//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// None of these reach the caller of an extraction request: the extractors
/// log them and fall back to partial or empty results.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A configured CSS selector does not parse
    #[error("Invalid selector '{0}': {1}")]
    Selector(String, String),

    /// A configured text pattern does not compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relay message could not be understood
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
