//! Configuration for the Extractor
//!
//! Everything tied to the profile page's markup lives in [`PagePatterns`] so
//! it can be retuned from a TOML file when the site changes, without touching
//! control flow.

use crate::error::ExtractorError;
use crate::html::parse_selector;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum wait for the contact overlay to render (milliseconds)
    pub overlay_timeout_ms: u64,

    /// Settle time between harvesting the overlay and closing it (milliseconds)
    pub close_delay_ms: u64,

    /// Maximum length of the about text (characters)
    pub about_max_chars: usize,

    /// Markup and text patterns of the profile page
    pub patterns: PagePatterns,
}

impl ExtractorConfig {
    /// Get the overlay timeout as a Duration
    pub fn overlay_timeout(&self) -> Duration {
        Duration::from_millis(self.overlay_timeout_ms)
    }

    /// Get the close delay as a Duration
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.overlay_timeout_ms == 0 {
            return Err("overlay_timeout_ms must be greater than 0".to_string());
        }
        if self.close_delay_ms >= self.overlay_timeout_ms {
            return Err("close_delay_ms must be shorter than overlay_timeout_ms".to_string());
        }
        if self.about_max_chars == 0 {
            return Err("about_max_chars must be greater than 0".to_string());
        }
        if self.patterns.contact_label.trim().is_empty() {
            return Err("patterns.contact_label must not be empty".to_string());
        }
        if self.patterns.section_headings.is_empty() {
            return Err("patterns.section_headings must list at least one selector".to_string());
        }
        if self.patterns.dismiss_labels.is_empty() {
            return Err("patterns.dismiss_labels must list at least one label".to_string());
        }
        self.patterns.check_selectors().map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            overlay_timeout_ms: 5_000,
            close_delay_ms: 100,
            about_max_chars: 500,
            patterns: PagePatterns::default(),
        }
    }
}

/// Selectors and text constants describing the profile page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePatterns {
    /// Primary content region
    pub primary_region: String,

    /// Page sections (the first one inside the primary region is the top card)
    pub section: String,

    /// Element holding the display name inside the top card
    pub name_heading: String,

    /// Section heading candidates, in priority order
    pub section_headings: Vec<String>,

    /// Paragraph-like elements
    pub paragraph: String,

    /// Any link
    pub link: String,

    /// Visible text of the contact-info link; the location sits right above it
    pub contact_label: String,

    /// Heading of the about section (compared case-insensitively)
    pub about_heading: String,

    /// Heading of the experience section (compared case-insensitively)
    pub experience_heading: String,

    /// Start of a dated experience line ("Jan 2022 - Present")
    pub date_pattern: String,

    /// Trailing expander text stripped from the about section (case-insensitive;
    /// a space also matches no or several whitespace characters)
    pub boilerplate: Vec<String>,

    /// Lines that look like a title but are list-pagination controls
    pub pagination_artifacts: Vec<String>,

    /// Company profile link, used when no experience entry names a company
    pub company_link: String,

    /// Link that opens the contact overlay
    pub contact_trigger: String,

    /// Virtualized list containers; the overlay renders into a new one
    pub lazy_column: String,

    /// Label/value items inside a lazy column
    pub overlay_item: String,

    /// Candidate controls for closing the overlay
    pub dismiss_control: String,

    /// Accessible-label fragments of the close control, in priority order
    pub dismiss_labels: Vec<String>,
}

impl Default for PagePatterns {
    fn default() -> Self {
        Self {
            primary_region: "main".to_string(),
            section: "section".to_string(),
            name_heading: "h2".to_string(),
            section_headings: vec![
                "h2".to_string(),
                "[role=\"heading\"]".to_string(),
                "h3".to_string(),
            ],
            paragraph: "p".to_string(),
            link: "a".to_string(),
            contact_label: "Contact info".to_string(),
            about_heading: "about".to_string(),
            experience_heading: "experience".to_string(),
            date_pattern: r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4}".to_string(),
            boilerplate: vec![
                "...see more".to_string(),
                "\u{2026} see more".to_string(),
                "see more".to_string(),
                "show more".to_string(),
                "show less".to_string(),
            ],
            pagination_artifacts: vec!["Show all".to_string(), "see more".to_string()],
            company_link: "a[href*=\"/company/\"]".to_string(),
            contact_trigger: "a[href*=\"/overlay/contact-info\"]".to_string(),
            lazy_column: "[data-testid=\"lazy-column\"]".to_string(),
            overlay_item: "div[componentkey]".to_string(),
            dismiss_control: "button[aria-label]".to_string(),
            dismiss_labels: vec!["dismiss".to_string(), "close".to_string()],
        }
    }
}

impl PagePatterns {
    /// Parse every configured CSS selector
    pub fn check_selectors(&self) -> Result<(), ExtractorError> {
        let single = [
            &self.primary_region,
            &self.section,
            &self.name_heading,
            &self.paragraph,
            &self.link,
            &self.company_link,
            &self.contact_trigger,
            &self.lazy_column,
            &self.overlay_item,
            &self.dismiss_control,
        ];
        for selector in single.into_iter().chain(&self.section_headings) {
            parse_selector(selector)?;
        }
        Ok(())
    }

    /// Compile the text patterns into regexes, after checking the selectors
    pub(crate) fn compile(&self) -> Result<CompiledPatterns, ExtractorError> {
        self.check_selectors()?;
        let date = Regex::new(&self.date_pattern)?;

        let phrases: Vec<String> = self
            .boilerplate
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                p.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s*")
            })
            .collect();
        if phrases.is_empty() {
            return Err(ExtractorError::Config(
                "patterns.boilerplate must list at least one phrase".to_string(),
            ));
        }
        // One or more trailing phrases, so a single pass leaves nothing to strip.
        let boilerplate = Regex::new(&format!(r"(?i)(?:\s*(?:{})\s*)+$", phrases.join("|")))?;

        Ok(CompiledPatterns { date, boilerplate })
    }
}

/// Regexes built from [`PagePatterns`]
#[derive(Debug, Clone)]
pub(crate) struct CompiledPatterns {
    pub date: Regex,
    pub boilerplate: Regex,
}
