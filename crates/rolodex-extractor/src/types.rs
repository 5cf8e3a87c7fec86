//! Relay message types

use rolodex_domain::ProfileRecord;
use serde::{Deserialize, Serialize};

/// Inbound request, tagged by its `action` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtractionRequest {
    /// Extract the profile currently shown: `{ "action": "extractProfile" }`
    ExtractProfile,
}

/// Outbound response; a request always gets exactly one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Whether the request was understood and answered
    pub success: bool,

    /// Extracted record, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProfileRecord>,

    /// Failure description, otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResponse {
    /// Successful response carrying `record`
    pub fn ok(record: ProfileRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    /// Failed response carrying `error`
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
