//! JSON message relay.
//!
//! One JSON object per line in, one per line out. Every message is answered,
//! including ones that cannot be parsed.

use crate::config::Config;
use crate::controller::Controller;
use crate::error::{CliError, Result};
use chrono::{SecondsFormat, Utc};
use rolodex_domain::{ProfileEntry, ProfileRecord, ProfileStore};
use rolodex_extractor::{Extractor, HtmlDocument};
use rolodex_sheets::{authorization_url, token_from_redirect};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Messages the relay understands
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RelayRequest {
    /// Extract the loaded page
    ExtractProfile,

    /// Without `redirectUrl`: get the consent URL. With it: capture the token.
    #[serde(rename_all = "camelCase")]
    Authenticate {
        /// URL the browser was redirected to after consent
        #[serde(default)]
        redirect_url: Option<String>,
    },

    /// Look up an existing row
    #[serde(rename_all = "camelCase")]
    CheckDuplicate {
        /// Canonical profile URL
        profile_url: String,
    },

    /// Add a row
    AppendRow {
        /// Record plus optional timestamp
        data: ProfileEntry,
    },

    /// Overwrite a row
    #[serde(rename_all = "camelCase")]
    UpdateRow {
        /// Record plus optional timestamp
        data: ProfileEntry,
        /// 1-based row number
        row_number: usize,
    },

    /// Suggest a networking note
    #[serde(rename = "generateAISummary", rename_all = "camelCase")]
    GenerateAiSummary {
        /// Extracted record
        profile_data: ProfileRecord,
    },
}

/// Answers relay messages against the loaded page and the configuration
pub struct Relay {
    config: Config,
    config_path: PathBuf,
    extractor: Extractor,
    page: Option<HtmlDocument>,
}

impl Relay {
    /// Create a new Relay; `page` is the document `extractProfile` reads
    pub fn new(config: Config, config_path: PathBuf, page: Option<HtmlDocument>) -> Result<Self> {
        let extractor = Extractor::new(config.extractor.clone())?;
        Ok(Self {
            config,
            config_path,
            extractor,
            page,
        })
    }

    /// Current configuration (tokens captured by `authenticate` included)
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Answer one line of input
    pub async fn handle_line(&mut self, line: &str) -> Value {
        let request: RelayRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Unparseable relay message");
                return failure(unknown_or_malformed(line, &e));
            }
        };
        debug!(?request, "Relay request");

        match self.dispatch(request).await {
            Ok(value) => value,
            Err(e) => failure(e.to_string()),
        }
    }

    async fn dispatch(&mut self, request: RelayRequest) -> Result<Value> {
        match request {
            RelayRequest::ExtractProfile => {
                let Some(page) = &self.page else {
                    return Ok(failure("No page loaded"));
                };
                let response = self
                    .extractor
                    .handle(page, rolodex_extractor::ExtractionRequest::ExtractProfile)
                    .await;
                Ok(serde_json::to_value(response)?)
            }
            RelayRequest::Authenticate { redirect_url } => self.authenticate(redirect_url),
            RelayRequest::CheckDuplicate { profile_url } => {
                let controller = Controller::from_config(&self.config)?;
                Ok(match controller.check_duplicate(&profile_url).await {
                    Some(found) => json!({
                        "found": true,
                        "rowNumber": found.row_number,
                        "savedDate": found.saved_date,
                    }),
                    None => json!({ "found": false }),
                })
            }
            RelayRequest::AppendRow { data } => {
                let store = self.require_store()?;
                store.append(&stamped(data)).await?;
                Ok(json!({ "success": true }))
            }
            RelayRequest::UpdateRow { data, row_number } => {
                let store = self.require_store()?;
                store.update(&stamped(data), row_number).await?;
                Ok(json!({ "success": true }))
            }
            RelayRequest::GenerateAiSummary { profile_data } => {
                let controller = Controller::from_config(&self.config)?;
                let summary = controller.require_note(&profile_data).await?;
                Ok(json!({ "success": true, "summary": summary }))
            }
        }
    }

    fn authenticate(&mut self, redirect_url: Option<String>) -> Result<Value> {
        let google = &self.config.google;
        let auth_url = authorization_url(&google.client_id, &google.redirect_uri)?;

        let Some(redirect) = redirect_url else {
            return Ok(json!({
                "success": false,
                "error": "Authorization required",
                "authUrl": auth_url.as_str(),
            }));
        };

        let token = token_from_redirect(&redirect)?;
        self.config.google.access_token = Some(token);
        self.config.save_to(&self.config_path)?;
        info!("Access token stored");
        Ok(json!({ "success": true }))
    }

    fn require_store(&self) -> Result<rolodex_sheets::SheetsClient> {
        self.config.sheets_client()?.ok_or_else(|| {
            CliError::NotConfigured("Please configure settings first (client id and sheet id)".into())
        })
    }
}

fn failure(error: impl Into<String>) -> Value {
    json!({ "success": false, "error": error.into() })
}

/// Entries arriving without a timestamp are stamped now
fn stamped(mut entry: ProfileEntry) -> ProfileEntry {
    if entry.timestamp.trim().is_empty() {
        entry.timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    entry
}

/// "Unknown action" for well-formed messages naming an action we lack
fn unknown_or_malformed(line: &str, error: &serde_json::Error) -> String {
    let known_shape = serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|v| v.get("action").and_then(Value::as_str).map(str::to_string));
    match known_shape {
        Some(action) if !is_known_action(&action) => "Unknown action".to_string(),
        _ => format!("Invalid request: {}", error),
    }
}

fn is_known_action(action: &str) -> bool {
    matches!(
        action,
        "extractProfile"
            | "authenticate"
            | "checkDuplicate"
            | "appendRow"
            | "updateRow"
            | "generateAISummary"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r#"
        <main><section>
          <h2>Jane Doe</h2>
          <p>Staff Engineer</p>
        </section></main>
    "#;

    fn relay(config: Config, dir: &TempDir) -> Relay {
        let page = HtmlDocument::parse("https://site/in/jane?trk=1", PAGE);
        Relay::new(config, dir.path().join("config.toml"), Some(page)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_profile() {
        let dir = TempDir::new().unwrap();
        let mut relay = relay(Config::default(), &dir);

        let response = relay.handle_line(r#"{"action":"extractProfile"}"#).await;

        assert_eq!(response["success"], json!(true));
        assert_eq!(response["data"]["name"], json!("Jane Doe"));
        assert_eq!(response["data"]["headline"], json!("Staff Engineer"));
        assert_eq!(response["data"]["profileUrl"], json!("https://site/in/jane"));
        assert_eq!(response["data"]["contactInfo"], json!(""));
    }

    #[tokio::test]
    async fn test_extract_without_page() {
        let dir = TempDir::new().unwrap();
        let mut relay = Relay::new(Config::default(), dir.path().join("c.toml"), None).unwrap();
        let response = relay.handle_line(r#"{"action":"extractProfile"}"#).await;
        assert_eq!(response, json!({ "success": false, "error": "No page loaded" }));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_messages() {
        let dir = TempDir::new().unwrap();
        let mut relay = relay(Config::default(), &dir);

        let response = relay.handle_line(r#"{"action":"dance"}"#).await;
        assert_eq!(response, json!({ "success": false, "error": "Unknown action" }));

        let response = relay.handle_line("{not json").await;
        assert_eq!(response["success"], json!(false));
        assert!(response["error"].as_str().unwrap().starts_with("Invalid request"));

        let response = relay.handle_line(r#"{"action":"checkDuplicate"}"#).await;
        assert!(response["error"].as_str().unwrap().contains("profileUrl"));
    }

    #[tokio::test]
    async fn test_check_duplicate_without_token_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.google.sheet_id = "sheet".into();
        let mut relay = relay(config, &dir);

        let response = relay
            .handle_line(r#"{"action":"checkDuplicate","profileUrl":"https://site/in/jane"}"#)
            .await;

        assert_eq!(response, json!({ "found": false }));
    }

    #[tokio::test]
    async fn test_append_without_token() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.google.sheet_id = "sheet".into();
        let mut relay = relay(config, &dir);

        let response = relay
            .handle_line(r#"{"action":"appendRow","data":{"name":"Jane","profileUrl":"https://site/in/jane"}}"#)
            .await;

        assert_eq!(response, json!({ "success": false, "error": "Not authenticated" }));
    }

    #[tokio::test]
    async fn test_summary_without_key() {
        let dir = TempDir::new().unwrap();
        let mut relay = relay(Config::default(), &dir);

        let response = relay
            .handle_line(r#"{"action":"generateAISummary","profileData":{"name":"Jane"}}"#)
            .await;

        assert_eq!(
            response,
            json!({ "success": false, "error": "Gemini API key not configured" })
        );
    }

    #[tokio::test]
    async fn test_authenticate_flow() {
        let dir = TempDir::new().unwrap();
        let mut relay = relay(Config::default(), &dir);

        let response = relay.handle_line(r#"{"action":"authenticate"}"#).await;
        assert_eq!(response, json!({ "success": false, "error": "Client ID not configured" }));

        relay.config.google.client_id = "cid".into();
        let response = relay.handle_line(r#"{"action":"authenticate"}"#).await;
        assert!(response["authUrl"].as_str().unwrap().contains("client_id=cid"));

        let response = relay
            .handle_line(r#"{"action":"authenticate","redirectUrl":"http://localhost/#access_token=tok123&expires_in=3599"}"#)
            .await;
        assert_eq!(response, json!({ "success": true }));
        assert_eq!(relay.config().google.access_token.as_deref(), Some("tok123"));

        let saved = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.google.access_token.as_deref(), Some("tok123"));

        let response = relay
            .handle_line(r#"{"action":"authenticate","redirectUrl":"http://localhost/#error=access_denied"}"#)
            .await;
        assert_eq!(response, json!({ "success": false, "error": "No access token received" }));
    }

    #[test]
    fn test_stamped_keeps_existing_timestamp() {
        let entry = ProfileEntry::new(ProfileRecord::default(), "2024-01-01T00:00:00.000Z");
        assert_eq!(stamped(entry).timestamp, "2024-01-01T00:00:00.000Z");

        let entry = ProfileEntry::new(ProfileRecord::default(), "");
        assert!(stamped(entry).timestamp.ends_with('Z'));
    }
}
