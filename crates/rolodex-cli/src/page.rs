//! Saved profile pages as live documents.
//!
//! A saved page has no scripts, so the contact overlay is supplied as a
//! separate HTML file: activating the contact link inserts it into the body,
//! and the dismiss control or back navigation removes it again.

use crate::error::{CliError, Result};
use rolodex_extractor::{Effect, HtmlDocument, PagePatterns};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Where a page comes from
#[derive(Debug, Clone)]
pub struct PageSource {
    /// Address the page was saved from
    pub url: String,

    /// Saved page markup
    pub html: PathBuf,

    /// Contact overlay markup
    pub overlay: Option<PathBuf>,
}

/// Read the page (and its overlay) into a document.
pub fn load_page(source: &PageSource, patterns: &PagePatterns) -> Result<HtmlDocument> {
    if source.url.trim().is_empty() {
        return Err(CliError::InvalidInput("page URL must not be empty".into()));
    }

    let html = fs::read_to_string(&source.html).map_err(|e| {
        CliError::InvalidInput(format!("cannot read {}: {}", source.html.display(), e))
    })?;
    let page = HtmlDocument::parse(source.url.trim(), &html);

    if let Some(path) = &source.overlay {
        let overlay = fs::read_to_string(path).map_err(|e| {
            CliError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
        })?;
        page.on_activate(
            &patterns.contact_trigger,
            Effect::OpenOverlay {
                parent: "body".to_string(),
                html: overlay,
            },
        )?;
        page.on_activate(&patterns.dismiss_control, Effect::DismissOverlay)?;
        debug!(overlay = %path.display(), "Contact overlay attached");
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_extractor::DocumentView;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_overlay_opens_and_closes() {
        let page_file = write(
            r#"<main><section><a href="/in/x/overlay/contact-info/">Contact info</a></section></main>"#,
        );
        let overlay_file = write(r#"<div><button aria-label="Dismiss">x</button></div>"#);
        let source = PageSource {
            url: "https://site/in/x/".into(),
            html: page_file.path().to_path_buf(),
            overlay: Some(overlay_file.path().to_path_buf()),
        };

        let page = load_page(&source, &PagePatterns::default()).unwrap();
        let link = page.select_first(None, "a").unwrap().unwrap();
        page.activate(link);
        assert!(page.has_open_overlay());

        let close = page.select_first(None, "button").unwrap().unwrap();
        page.activate(close);
        assert!(!page.has_open_overlay());
        assert_eq!(page.url(), "https://site/in/x/");
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let source = PageSource {
            url: "https://site/in/x/".into(),
            html: PathBuf::from("/definitely/not/here.html"),
            overlay: None,
        };
        let err = load_page(&source, &PagePatterns::default()).err();
        assert!(matches!(err, Some(CliError::InvalidInput(_))));
    }
}
