//! Rolodex Domain Layer
//!
//! Plain data and trait seams shared by every other crate. The only external
//! dependency is `serde`, because records travel as JSON across the relay and
//! into the spreadsheet adapter.
//!
//! ## Key Concepts
//!
//! - **ProfileRecord**: the fields scraped from one profile page
//! - **ProfileEntry**: a record stamped with a save time, mapped to a sheet row
//! - **DuplicateMatch**: where an already-saved profile lives in the sheet
//! - **Traits**: the boundaries to the AI provider and the spreadsheet

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use entry::{DuplicateMatch, ProfileEntry, COLUMN_COUNT, COLUMN_HEADERS};
pub use record::{canonical_profile_url, country_of, ProfileRecord, MIDDOT};
pub use traits::{LlmProvider, ProfileStore};
