//! Request coordination: field extraction followed by the contact overlay

use crate::config::ExtractorConfig;
use crate::contact::ContactOverlayExtractor;
use crate::document::DocumentView;
use crate::error::ExtractorError;
use crate::fields::FieldExtractor;
use crate::types::{ExtractionRequest, ExtractionResponse};
use rolodex_domain::ProfileRecord;
use tracing::{debug, info, warn};

/// Answers relay requests against a page document
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    fields: FieldExtractor,
    contact: ContactOverlayExtractor,
}

impl Extractor {
    /// Create a new Extractor, rejecting invalid configuration up front
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            fields: FieldExtractor::new(&config)?,
            contact: ContactOverlayExtractor::new(&config),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every field, then wait for the contact overlay.
    ///
    /// Never fails: structure the page lacks stays empty and an overlay that
    /// never renders leaves `contact_info` empty.
    pub async fn extract_profile<D: DocumentView>(&self, doc: &D) -> ProfileRecord {
        let mut record = self.fields.extract(doc);
        record.contact_info = self.contact.extract(doc).await;

        info!(
            url = %record.profile_url,
            name = %record.name,
            has_contact = !record.contact_info.is_empty(),
            "Profile extracted"
        );
        record
    }

    /// Answer a parsed request
    pub async fn handle<D: DocumentView>(
        &self,
        doc: &D,
        request: ExtractionRequest,
    ) -> ExtractionResponse {
        match request {
            ExtractionRequest::ExtractProfile => {
                ExtractionResponse::ok(self.extract_profile(doc).await)
            }
        }
    }

    /// Answer a raw JSON message; malformed input still gets a response
    pub async fn handle_json<D: DocumentView>(&self, doc: &D, message: &str) -> ExtractionResponse {
        match parse_request(message) {
            Ok(request) => {
                debug!(?request, "Handling relay request");
                self.handle(doc, request).await
            }
            Err(e) => {
                warn!(error = %e, "Rejected relay message");
                ExtractionResponse::failed(e.to_string())
            }
        }
    }
}

/// Parse a relay message, naming the offending action when it is unknown
pub fn parse_request(message: &str) -> Result<ExtractionRequest, ExtractorError> {
    let value: serde_json::Value = serde_json::from_str(message)?;
    let action = value
        .get("action")
        .and_then(|a| a.as_str())
        .ok_or_else(|| ExtractorError::InvalidRequest("missing action".to_string()))?
        .to_string();
    serde_json::from_value(value)
        .map_err(|_| ExtractorError::InvalidRequest(format!("unknown action '{}'", action)))
}
