//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use rolodex_domain::{DuplicateMatch, ProfileRecord};
use tabled::{
    builder::Builder,
    settings::{object::Columns, Modify, Style, Width},
};

/// Widest cell in the record table before wrapping
const VALUE_WIDTH: usize = 72;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extracted record.
    pub fn format_record(&self, record: &ProfileRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(self.format_record_table(record)),
            OutputFormat::Quiet => Ok(record.profile_url.clone()),
        }
    }

    /// Format a record as a two-column table; empty fields show as "-".
    fn format_record_table(&self, record: &ProfileRecord) -> String {
        let fields = [
            ("Name", &record.name),
            ("Headline", &record.headline),
            ("Title", &record.current_title),
            ("Company", &record.current_company),
            ("Location", &record.location),
            ("Country", &record.country),
            ("About", &record.about),
            ("Contact", &record.contact_info),
            ("Profile URL", &record.profile_url),
            ("Notes", &record.notes),
        ];

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (label, value) in fields {
            let value = if value.is_empty() { "-" } else { value.as_str() };
            builder.push_record([label, value]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Width::wrap(VALUE_WIDTH)));

        table.to_string()
    }

    /// Describe an existing row for the same profile.
    pub fn duplicate(&self, found: &DuplicateMatch) -> String {
        self.warning(&format!(
            "Already saved on: {} (Row {})",
            found.saved_date, found.row_number
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
