//! Saved entries and their tabular layout.

use crate::record::ProfileRecord;
use serde::{Deserialize, Serialize};

/// Number of columns a saved profile occupies (A through K).
pub const COLUMN_COUNT: usize = 11;

/// Header labels in column order.
pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "Timestamp",
    "Name",
    "Headline",
    "Company",
    "Title",
    "Location",
    "Country",
    "About",
    "Profile URL",
    "Notes",
    "Contact Info",
];

/// A profile record stamped with the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    /// The extracted (and annotated) record
    #[serde(flatten)]
    pub record: ProfileRecord,

    /// ISO-8601 save time
    #[serde(default)]
    pub timestamp: String,
}

impl ProfileEntry {
    /// Stamp a record with a save time.
    pub fn new(record: ProfileRecord, timestamp: impl Into<String>) -> Self {
        Self {
            record,
            timestamp: timestamp.into(),
        }
    }

    /// Cells in sheet column order.
    pub fn to_row(&self) -> [String; COLUMN_COUNT] {
        let r = &self.record;
        [
            self.timestamp.clone(),
            r.name.clone(),
            r.headline.clone(),
            r.current_company.clone(),
            r.current_title.clone(),
            r.location.clone(),
            r.country.clone(),
            r.about.clone(),
            r.profile_url.clone(),
            r.notes.clone(),
            r.contact_info.clone(),
        ]
    }
}

/// An already-saved row for the same profile URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateMatch {
    /// 1-based sheet row number
    pub row_number: usize,

    /// Date part of the stored timestamp, or "Unknown"
    pub saved_date: String,
}
