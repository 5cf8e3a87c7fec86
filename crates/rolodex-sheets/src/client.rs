//! Google Sheets client.

use crate::error::SheetsError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rolodex_domain::traits::ProfileStore;
use rolodex_domain::{DuplicateMatch, ProfileEntry, COLUMN_COUNT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Sheets API v4 spreadsheet collection
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Tab used when none is configured
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Saved-date text when the stored timestamp cannot be read
pub const UNKNOWN_DATE: &str = "Unknown";

const TIMEOUT_SECS: u64 = 30;

/// Body of the `values` endpoints
#[derive(Debug, Default, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Reads and writes saved profiles in one tab of a spreadsheet.
///
/// Rows follow [`ProfileEntry::to_row`]: column I holds the profile URL and
/// column A the save timestamp. Row 1 is the header row.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: Option<String>,
    http: reqwest::Client,
}

impl SheetsClient {
    /// Create a new client for `spreadsheet_id`
    pub fn new(spreadsheet_id: impl Into<String>) -> Result<Self, SheetsError> {
        let spreadsheet_id = spreadsheet_id.into();
        if spreadsheet_id.trim().is_empty() {
            return Err(SheetsError::MissingSpreadsheetId);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| SheetsError::Connection(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.trim().to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            access_token: None,
            http,
        })
    }

    /// Point at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a named tab; blank falls back to [`DEFAULT_SHEET_NAME`]
    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        let name = sheet_name.into();
        self.sheet_name = if name.trim().is_empty() {
            DEFAULT_SHEET_NAME.to_string()
        } else {
            name
        };
        self
    }

    /// Bearer token for API calls
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Tab in use
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// True when a token is set
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn token(&self) -> Result<&str, SheetsError> {
        self.access_token
            .as_deref()
            .ok_or(SheetsError::NotAuthenticated)
    }

    /// `{base}/{id}/values/{sheet}!{cells}{suffix}`, with the range as one
    /// encoded path segment
    fn values_url(&self, cells: &str, suffix: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.base_url)?;
        let range = format!("{}!{}{}", self.sheet_name, cells, suffix);
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&range);
        Ok(url)
    }

    async fn get_values(&self, cells: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let token = self.token()?;
        let url = self.values_url(cells, "")?;

        let response = self.http.get(url).bearer_auth(token).send().await?;
        if !response.status().is_success() {
            let message = api_error_message(response)
                .await
                .unwrap_or_else(|| format!("Failed to read {}", cells));
            return Err(SheetsError::Api(message));
        }
        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }

    async fn write_row(
        &self,
        request: reqwest::RequestBuilder,
        entry: &ProfileEntry,
        fallback: &str,
    ) -> Result<(), SheetsError> {
        let token = self.token()?;
        let body = ValueRange {
            values: vec![entry.to_row().to_vec()],
        };
        let response = request.bearer_auth(token).json(&body).send().await?;
        if !response.status().is_success() {
            let message = api_error_message(response)
                .await
                .unwrap_or_else(|| fallback.to_string());
            warn!(%message, "Sheets write rejected");
            return Err(SheetsError::Api(message));
        }
        Ok(())
    }

    /// Date the row was saved, from its column-A timestamp
    async fn saved_date(&self, row_number: usize) -> String {
        match self.get_values(&format!("A{}", row_number)).await {
            Ok(values) => {
                let cell = values.first().and_then(|row| row.first());
                date_part(cell.map(String::as_str))
            }
            Err(e) => {
                debug!(error = %e, row_number, "Could not read saved timestamp");
                UNKNOWN_DATE.to_string()
            }
        }
    }
}

impl ProfileStore for SheetsClient {
    type Error = SheetsError;

    async fn find_profile(&self, profile_url: &str) -> Result<Option<DuplicateMatch>, Self::Error> {
        // I holds the URL, J the notes
        let rows = self.get_values("I:J").await?;

        let position = rows
            .iter()
            .skip(1)
            .position(|row| row.first().is_some_and(|cell| !cell.is_empty() && cell == profile_url));
        let Some(index) = position else {
            debug!(profile_url, "Profile not saved yet");
            return Ok(None);
        };

        // header row skipped, plus 1-based numbering
        let row_number = index + 2;
        let saved_date = self.saved_date(row_number).await;
        info!(profile_url, row_number, %saved_date, "Profile already saved");
        Ok(Some(DuplicateMatch {
            row_number,
            saved_date,
        }))
    }

    async fn append(&self, entry: &ProfileEntry) -> Result<(), Self::Error> {
        let mut url = self.values_url("A:K", ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        self.write_row(self.http.post(url), entry, "Failed to append row")
            .await?;
        info!(profile_url = %entry.record.profile_url, columns = COLUMN_COUNT, "Row appended");
        Ok(())
    }

    async fn update(&self, entry: &ProfileEntry, row_number: usize) -> Result<(), Self::Error> {
        let mut url = self.values_url(&format!("A{0}:K{0}", row_number), "")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        self.write_row(self.http.put(url), entry, "Failed to update row")
            .await?;
        info!(profile_url = %entry.record.profile_url, row_number, "Row updated");
        Ok(())
    }
}

async fn api_error_message(response: reqwest::Response) -> Option<String> {
    response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .and_then(|error| error.message)
}

/// Calendar date of a stored timestamp.
///
/// RFC 3339 and plain `YYYY-MM-DD[ HH:MM:SS]` values become `YYYY-MM-DD`.
/// Other non-empty text, such as a locale-formatted date-time, keeps its
/// first word; an empty or absent cell gives [`UNKNOWN_DATE`].
pub fn date_part(cell: Option<&str>) -> String {
    let Some(raw) = cell.map(str::trim).filter(|c| !c.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.date().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.to_string();
    }
    raw.split_whitespace()
        .next()
        .unwrap_or(UNKNOWN_DATE)
        .to_string()
}
