//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use rolodex_extractor::ExtractorConfig;
use rolodex_llm::GeminiProvider;
use rolodex_sheets::{SheetsClient, DEFAULT_SHEET_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Google account and spreadsheet
    #[serde(default)]
    pub google: GoogleSettings,

    /// AI note generation
    #[serde(default)]
    pub ai: AiSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Page extraction tuning
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Spreadsheet target and OAuth state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth client id
    pub client_id: String,

    /// Spreadsheet id (from its URL)
    pub sheet_id: String,

    /// Tab name
    pub sheet_name: String,

    /// Redirect URI registered for the OAuth client
    pub redirect_uri: String,

    /// Token captured by `rolodex auth`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Alternative Sheets API root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets_endpoint: Option<String>,
}

/// Gemini settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// API key; note generation is off without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Alternative API root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// A few words about the user, quoted in the prompt
    pub user_background: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Review session history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Default configuration file path (`~/.rolodex/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".rolodex").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Check values that would break later operations.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)
    }

    /// Client id and sheet id are both set.
    pub fn is_configured(&self) -> bool {
        !self.google.client_id.trim().is_empty() && !self.google.sheet_id.trim().is_empty()
    }

    /// Fail unless a save could succeed: settings present and authorized.
    pub fn require_ready_to_save(&self) -> Result<()> {
        if !self.is_configured() {
            return Err(CliError::NotConfigured(
                "Please configure settings first (client id and sheet id)".into(),
            ));
        }
        if self.google.access_token.is_none() {
            return Err(CliError::NotConfigured(
                "Please authenticate with Google first (rolodex auth)".into(),
            ));
        }
        Ok(())
    }

    /// Spreadsheet client, or `None` while no sheet is configured.
    pub fn sheets_client(&self) -> Result<Option<SheetsClient>> {
        if self.google.sheet_id.trim().is_empty() {
            return Ok(None);
        }
        let mut client = SheetsClient::new(self.google.sheet_id.clone())?
            .with_sheet_name(self.google.sheet_name.clone())
            .with_access_token(self.google.access_token.clone());
        if let Some(endpoint) = &self.google.sheets_endpoint {
            client = client.with_base_url(endpoint.clone());
        }
        Ok(Some(client))
    }

    /// Gemini provider, or `None` while no key is configured.
    pub fn gemini(&self) -> Result<Option<GeminiProvider>> {
        let Some(key) = self
            .ai
            .gemini_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        let mut provider = GeminiProvider::new(key)?.with_model(self.ai.model.clone());
        if let Some(endpoint) = &self.ai.endpoint {
            provider = provider.with_endpoint(endpoint.clone());
        }
        Ok(Some(provider))
    }

    /// User background, if any.
    pub fn background(&self) -> Option<&str> {
        Some(self.ai.user_background.as_str()).filter(|b| !b.trim().is_empty())
    }
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            sheet_id: String::new(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            redirect_uri: "http://localhost".to_string(),
            access_token: None,
            sheets_endpoint: None,
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: rolodex_llm::gemini::DEFAULT_MODEL.to_string(),
            endpoint: None,
            user_background: String::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

/// Show only the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
