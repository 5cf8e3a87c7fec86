//! OAuth 2.0 implicit flow.
//!
//! The user opens the authorization URL in a browser, consents, and is sent
//! to the redirect URI with the token in the URL fragment. Tokens are not
//! refreshed; when one expires the flow is simply run again.

use crate::error::SheetsError;
use tracing::debug;
use url::Url;

/// Google's authorization endpoint
pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Read/write access to spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// URL to send the user to for consent.
///
/// # Errors
///
/// [`SheetsError::MissingClientId`] when `client_id` is blank.
pub fn authorization_url(client_id: &str, redirect_uri: &str) -> Result<Url, SheetsError> {
    if client_id.trim().is_empty() {
        return Err(SheetsError::MissingClientId);
    }

    let mut url = Url::parse(AUTH_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id.trim())
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "token")
        .append_pair("scope", SPREADSHEETS_SCOPE)
        .append_pair("prompt", "consent");
    Ok(url)
}

/// Pull the access token out of the URL the browser was redirected to.
pub fn token_from_redirect(redirect: &str) -> Result<String, SheetsError> {
    let url = Url::parse(redirect.trim())?;
    let fragment = url.fragment().unwrap_or_default();

    let token = url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(SheetsError::NoAccessToken)?;

    debug!("Access token captured from redirect");
    Ok(token)
}
