//! Rolodex spreadsheet adapter
//!
//! Saves profiles as rows of a Google Sheet and finds rows saved earlier.
//! Authorization uses the OAuth implicit flow; see [`auth`].
//!
//! # Example
//!
//! ```no_run
//! use rolodex_domain::{ProfileEntry, ProfileRecord, ProfileStore};
//! use rolodex_sheets::SheetsClient;
//!
//! # async fn example() -> Result<(), rolodex_sheets::SheetsError> {
//! let client = SheetsClient::new("1AbC...")?
//!     .with_sheet_name("Contacts")
//!     .with_access_token(Some("ya29....".to_string()));
//!
//! let record = ProfileRecord::for_url("https://www.linkedin.com/in/jane/");
//! match client.find_profile(&record.profile_url).await? {
//!     Some(existing) => println!("Saved on {} (row {})", existing.saved_date, existing.row_number),
//!     None => client.append(&ProfileEntry::new(record, "2024-01-01T00:00:00Z")).await?,
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod auth;
mod client;
mod error;

pub use auth::{authorization_url, token_from_redirect};
pub use client::{date_part, SheetsClient, DEFAULT_BASE_URL, DEFAULT_SHEET_NAME, UNKNOWN_DATE};
pub use error::SheetsError;
