//! Settings command implementation.

use crate::cli::{SettingsAction, SettingsArgs};
use crate::config::{mask_secret, Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use serde_json::json;
use std::path::Path;

/// Execute the settings command.
pub async fn execute_settings(
    args: SettingsArgs,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        SettingsAction::Show => show_settings(config, config_path, formatter),
        SettingsAction::Set {
            client_id,
            sheet_id,
            sheet_name,
            gemini_key,
            background,
            redirect_uri,
        } => {
            let changes = SettingsChanges {
                client_id,
                sheet_id,
                sheet_name,
                gemini_key,
                background,
                redirect_uri,
            };
            apply_changes(config, changes)?;
            config.save_to(config_path)?;
            println!("{}", formatter.success("Settings saved"));
            Ok(())
        }
    }
}

/// Values given to `settings set`; `None` leaves the current value.
#[derive(Debug, Default)]
struct SettingsChanges {
    client_id: Option<String>,
    sheet_id: Option<String>,
    sheet_name: Option<String>,
    gemini_key: Option<String>,
    background: Option<String>,
    redirect_uri: Option<String>,
}

/// Apply `changes`; the result must name a client id and a sheet id.
fn apply_changes(config: &mut Config, changes: SettingsChanges) -> Result<()> {
    let mut updated = config.clone();
    let google = &mut updated.google;

    if let Some(client_id) = changes.client_id {
        google.client_id = client_id.trim().to_string();
    }
    if let Some(sheet_id) = changes.sheet_id {
        google.sheet_id = sheet_id.trim().to_string();
    }
    if let Some(sheet_name) = changes.sheet_name {
        let sheet_name = sheet_name.trim();
        if !sheet_name.is_empty() {
            google.sheet_name = sheet_name.to_string();
        }
    }
    if let Some(redirect_uri) = changes.redirect_uri {
        google.redirect_uri = redirect_uri.trim().to_string();
    }
    if let Some(key) = changes.gemini_key {
        let key = key.trim();
        updated.ai.gemini_api_key = (!key.is_empty()).then(|| key.to_string());
    }
    if let Some(background) = changes.background {
        updated.ai.user_background = background.trim().to_string();
    }

    if !updated.is_configured() {
        return Err(CliError::InvalidInput(
            "Please fill in Client ID and Sheet ID".to_string(),
        ));
    }

    *config = updated;
    Ok(())
}

/// Show current settings with secrets masked.
fn show_settings(config: &Config, config_path: &Path, formatter: &Formatter) -> Result<()> {
    let key = config.ai.gemini_api_key.as_deref().map(mask_secret);
    let authenticated = config.google.access_token.is_some();

    if formatter.format() == OutputFormat::Json {
        let output = json!({
            "configFile": config_path.display().to_string(),
            "clientId": config.google.client_id,
            "sheetId": config.google.sheet_id,
            "sheetName": config.google.sheet_name,
            "redirectUri": config.google.redirect_uri,
            "authenticated": authenticated,
            "geminiApiKey": key,
            "model": config.ai.model,
            "userBackground": config.ai.user_background,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let or_unset = |value: &str| {
        if value.is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };

    println!("Config file: {}", config_path.display());
    println!("  Client ID:   {}", or_unset(&config.google.client_id));
    println!("  Sheet ID:    {}", or_unset(&config.google.sheet_id));
    println!("  Sheet name:  {}", config.google.sheet_name);
    println!("  Redirect:    {}", config.google.redirect_uri);
    println!(
        "  Google:      {}",
        if authenticated {
            formatter.success("authenticated")
        } else {
            formatter.warning("not authenticated")
        }
    );
    println!("  Gemini key:  {}", key.unwrap_or_else(|| "(not set)".to_string()));
    println!("  Model:       {}", config.ai.model);
    println!("  Background:  {}", or_unset(&config.ai.user_background));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_client_and_sheet_ids() {
        let mut config = Config::default();
        let err = apply_changes(
            &mut config,
            SettingsChanges {
                client_id: Some("client".into()),
                ..SettingsChanges::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Please fill in Client ID and Sheet ID");
        assert!(config.google.client_id.is_empty());
    }

    #[test]
    fn test_apply_changes() {
        let mut config = Config::default();
        apply_changes(
            &mut config,
            SettingsChanges {
                client_id: Some(" client ".into()),
                sheet_id: Some("sheet".into()),
                sheet_name: Some("  ".into()),
                gemini_key: Some("key-1234".into()),
                background: Some("Recruiter".into()),
                redirect_uri: None,
            },
        )
        .unwrap();

        assert_eq!(config.google.client_id, "client");
        assert_eq!(config.google.sheet_name, "Sheet1");
        assert_eq!(config.ai.gemini_api_key.as_deref(), Some("key-1234"));
        assert_eq!(config.background(), Some("Recruiter"));

        apply_changes(
            &mut config,
            SettingsChanges {
                gemini_key: Some(String::new()),
                ..SettingsChanges::default()
            },
        )
        .unwrap();
        assert!(config.ai.gemini_api_key.is_none());
    }
}
