//! Error types for the spreadsheet adapter.

use thiserror::Error;

/// Spreadsheet and authorization errors
#[derive(Debug, Error)]
pub enum SheetsError {
    /// No access token; authorize first
    #[error("Not authenticated")]
    NotAuthenticated,

    /// OAuth client id missing from settings
    #[error("Client ID not configured")]
    MissingClientId,

    /// Spreadsheet id missing from settings
    #[error("Spreadsheet ID not configured")]
    MissingSpreadsheetId,

    /// The authorization redirect carried no token
    #[error("No access token received")]
    NoAccessToken,

    /// The API rejected the call; carries its message
    #[error("{0}")]
    Api(String),

    /// Connection error (network, DNS, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A URL could not be built or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body could not be read
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SheetsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SheetsError::Connection(e.to_string())
        } else if e.is_decode() {
            SheetsError::InvalidResponse(e.to_string())
        } else {
            SheetsError::Api(e.to_string())
        }
    }
}

impl From<url::ParseError> for SheetsError {
    fn from(e: url::ParseError) -> Self {
        SheetsError::InvalidUrl(e.to_string())
    }
}
