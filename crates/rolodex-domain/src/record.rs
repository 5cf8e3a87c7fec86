//! The profile record produced by a single extraction.

use serde::{Deserialize, Serialize};

/// Separator the profile page uses to glue pills together
/// ("Berlin, Germany · 500+ connections").
pub const MIDDOT: char = '\u{00B7}';

/// Structured fields scraped from one profile page.
///
/// Every field is plain text and defaults to the empty string, so consumers
/// never have to deal with missing values. Keys missing from incoming JSON
/// deserialize to empty strings as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    /// Display name
    pub name: String,

    /// Short self-description line
    pub headline: String,

    /// Free-text location
    pub location: String,

    /// Last comma-separated segment of `location`
    pub country: String,

    /// Page URL without its query string
    pub profile_url: String,

    /// Company of the most recent dated role
    pub current_company: String,

    /// Title of the most recent dated role
    pub current_title: String,

    /// About section, boilerplate stripped and truncated
    pub about: String,

    /// Newline-joined `label: value` pairs from the contact overlay
    pub contact_info: String,

    /// Annotation added after extraction (typed or generated)
    pub notes: String,
}

impl ProfileRecord {
    /// Empty record for the page at `url`, with `profile_url` canonicalized.
    pub fn for_url(url: &str) -> Self {
        Self {
            profile_url: canonical_profile_url(url),
            ..Self::default()
        }
    }

    /// Set the location and derive the country from it.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.country = country_of(&self.location);
    }

    /// True when nothing beyond the URL was extracted.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.headline.is_empty()
            && self.location.is_empty()
            && self.current_company.is_empty()
            && self.current_title.is_empty()
            && self.about.is_empty()
            && self.contact_info.is_empty()
    }
}

/// Strip the query string so the same profile always maps to the same URL.
///
/// ```
/// use rolodex_domain::canonical_profile_url;
///
/// assert_eq!(canonical_profile_url("https://site/in/x?foo=1"), "https://site/in/x");
/// assert_eq!(canonical_profile_url("https://site/in/x"), "https://site/in/x");
/// ```
pub fn canonical_profile_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// Country part of a location: the trimmed text after the last comma.
///
/// Returns an empty string when the location has no comma.
pub fn country_of(location: &str) -> String {
    match location.rsplit_once(',') {
        Some((_, country)) => country.trim().to_string(),
        None => String::new(),
    }
}
