//! Rolodex Extractor
//!
//! Turns a rendered profile page into a [`ProfileRecord`](rolodex_domain::ProfileRecord).
//!
//! # Overview
//!
//! The page is reached through the [`DocumentView`] trait: CSS-selector
//! queries, text rendering, activation of links and buttons, back navigation
//! and a feed of structural mutations. [`HtmlDocument`] implements it on top
//! of `scraper` for saved pages.
//!
//! # Architecture
//!
//! ```text
//! request → Extractor → FieldExtractor          → record
//!                     → ContactOverlayExtractor → record.contact_info
//!                                               → response
//! ```
//!
//! Field extraction is synchronous and heuristic. The contact overlay is the
//! only asynchronous step: the extractor activates the contact link, waits on
//! mutations for a newly rendered list (5 s at most), harvests its
//! `label: value` pairs and closes the overlay again.
//!
//! # Example Usage
//!
//! ```no_run
//! use rolodex_extractor::{Extractor, ExtractorConfig, HtmlDocument};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let html = std::fs::read_to_string("profile.html")?;
//! let page = HtmlDocument::parse("https://www.linkedin.com/in/jane/", &html);
//!
//! let extractor = Extractor::new(ExtractorConfig::default())?;
//! let response = extractor
//!     .handle_json(&page, r#"{"action":"extractProfile"}"#)
//!     .await;
//!
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod contact;
mod document;
mod error;
mod extractor;
mod fields;
mod html;
mod types;


pub use config::{ExtractorConfig, PagePatterns};
pub use contact::ContactOverlayExtractor;
pub use document::{DocumentView, MutationReceiver};
pub use error::ExtractorError;
pub use extractor::{parse_request, Extractor};
pub use fields::{strip_boilerplate, FieldExtractor};
pub use html::{Effect, HtmlDocument};
pub use types::{ExtractionRequest, ExtractionResponse};
