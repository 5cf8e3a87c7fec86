//! Contact details from the transient contact-info overlay
//!
//! The overlay only exists after the contact link is activated. It renders
//! into a fresh lazy column, so the columns present before activation are
//! recorded and ignored. The wait is event driven: every mutation of the
//! document triggers a scan, bounded by the configured timeout.

use crate::config::{ExtractorConfig, PagePatterns};
use crate::document::DocumentView;
use crate::error::ExtractorError;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Opens the contact overlay, harvests its `label: value` pairs and closes it
#[derive(Debug, Clone)]
pub struct ContactOverlayExtractor {
    patterns: PagePatterns,
    timeout: Duration,
    close_delay: Duration,
}

impl ContactOverlayExtractor {
    /// Create a new ContactOverlayExtractor
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            patterns: config.patterns.clone(),
            timeout: config.overlay_timeout(),
            close_delay: config.close_delay(),
        }
    }

    /// Newline-joined `label: value` lines, or an empty string when the page
    /// has no contact link or the overlay never shows anything.
    pub async fn extract<D: DocumentView>(&self, doc: &D) -> String {
        match self.run(doc).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Contact overlay extraction failed");
                String::new()
            }
        }
    }

    async fn run<D: DocumentView>(&self, doc: &D) -> Result<String, ExtractorError> {
        let Some(trigger) = self.find_trigger(doc)? else {
            info!("No contact info link found");
            return Ok(String::new());
        };

        let baseline: HashSet<D::Node> = doc
            .select_all(None, &self.patterns.lazy_column)?
            .into_iter()
            .collect();

        let mut mutations = doc.subscribe();
        doc.activate(trigger);

        // From here on the page must be restored whatever happens.
        let observe = async {
            while mutations.changed().await.is_ok() {
                if let Some(text) = self.scan_new_columns(doc, &baseline)? {
                    return Ok(Some(text));
                }
            }
            Ok::<_, ExtractorError>(None)
        };

        let harvested = match timeout(self.timeout, observe).await {
            Ok(Ok(Some(text))) => {
                sleep(self.close_delay).await;
                Ok(Some(text))
            }
            Ok(Err(e)) => Err(e),
            Ok(Ok(None)) | Err(_) => self.scan_new_columns(doc, &baseline),
        };

        match harvested {
            Ok(Some(text)) => {
                debug!(lines = text.lines().count(), "Contact overlay harvested");
                self.restore(doc);
                Ok(text)
            }
            Ok(None) => {
                info!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Contact overlay never rendered, navigating back"
                );
                doc.navigate_back();
                Ok(String::new())
            }
            Err(e) => {
                self.restore(doc);
                Err(e)
            }
        }
    }

    /// Close the overlay, falling back to back navigation
    fn restore<D: DocumentView>(&self, doc: &D) {
        if let Err(e) = self.close_overlay(doc) {
            warn!(error = %e, "Could not look for a dismiss control, navigating back");
            doc.navigate_back();
        }
    }

    /// The contact link, by destination first and visible text second
    fn find_trigger<D: DocumentView>(&self, doc: &D) -> Result<Option<D::Node>, ExtractorError> {
        if let Some(link) = doc.select_first(None, &self.patterns.contact_trigger)? {
            return Ok(Some(link));
        }
        let label = self.patterns.contact_label.as_str();
        Ok(doc
            .select_all(None, &self.patterns.link)?
            .into_iter()
            .find(|&link| doc.text_content(link).trim() == label))
    }

    /// Text of the first lazy column that appeared after activation and holds entries
    fn scan_new_columns<D: DocumentView>(
        &self,
        doc: &D,
        baseline: &HashSet<D::Node>,
    ) -> Result<Option<String>, ExtractorError> {
        for column in doc.select_all(None, &self.patterns.lazy_column)? {
            if baseline.contains(&column) {
                continue;
            }
            if let Some(text) = self.read_entries(doc, column)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    fn read_entries<D: DocumentView>(
        &self,
        doc: &D,
        column: D::Node,
    ) -> Result<Option<String>, ExtractorError> {
        let mut entries = Vec::new();
        for item in doc.select_all(Some(column), &self.patterns.overlay_item)? {
            let paragraphs = doc.select_all(Some(item), &self.patterns.paragraph)?;
            if let [label, value, ..] = paragraphs.as_slice() {
                let label = doc.text_content(*label).trim().to_string();
                let value = doc.text_content(*value).trim().to_string();
                if !label.is_empty() && !value.is_empty() {
                    entries.push(format!("{}: {}", label, value));
                }
            }
        }
        Ok((!entries.is_empty()).then(|| entries.join("\n")))
    }

    /// Activate the dismiss control, or go back when the overlay has none
    fn close_overlay<D: DocumentView>(&self, doc: &D) -> Result<(), ExtractorError> {
        let controls: Vec<(D::Node, String)> = doc
            .select_all(None, &self.patterns.dismiss_control)?
            .into_iter()
            .filter_map(|node| {
                doc.attribute(node, "aria-label")
                    .map(|label| (node, label.to_lowercase()))
            })
            .collect();

        for wanted in &self.patterns.dismiss_labels {
            let wanted = wanted.to_lowercase();
            if let Some((node, _)) = controls.iter().find(|(_, label)| label.contains(&wanted)) {
                doc.activate(*node);
                return Ok(());
            }
        }

        debug!("No dismiss control found, navigating back");
        doc.navigate_back();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{Effect, HtmlDocument};

    const PROFILE: &str = r#"
        <html><body>
          <div data-testid="lazy-column">
            <div componentkey="feed"><p>Old</p><p>Column</p></div>
          </div>
          <main><section>
            <h2>Jane Doe</h2>
            <a href="/in/jane/overlay/contact-info/">Contact info</a>
          </section></main>
        </body></html>
    "#;

    const OVERLAY: &str = r#"
        <div role="dialog">
          <button aria-label="Dismiss">x</button>
          <div data-testid="lazy-column">
            <div componentkey="email"><p>Email</p><p>a@b.com</p></div>
            <div componentkey="phone"><p>Phone</p><p> 555-1234 </p></div>
            <div componentkey="empty"><p>Website</p><p>  </p></div>
            <div componentkey="single"><p>Lonely</p></div>
          </div>
        </div>
    "#;

    fn extractor() -> ContactOverlayExtractor {
        ContactOverlayExtractor::new(&ExtractorConfig::default())
    }

    fn profile_with_overlay() -> HtmlDocument {
        let doc = HtmlDocument::parse("https://site/in/jane/", PROFILE);
        doc.on_activate(
            "a[href*=\"/overlay/contact-info\"]",
            Effect::OpenOverlay {
                parent: "body".to_string(),
                html: OVERLAY.to_string(),
            },
        )
        .unwrap();
        doc.on_activate("button[aria-label=\"Dismiss\"]", Effect::DismissOverlay)
            .unwrap();
        doc
    }

    #[tokio::test(start_paused = true)]
    async fn test_harvests_overlay_and_dismisses_it() {
        let doc = profile_with_overlay();

        let text = extractor().extract(&doc).await;

        assert_eq!(text, "Email: a@b.com\nPhone: 555-1234");
        assert!(!doc.has_open_overlay());
        assert_eq!(doc.back_navigation_count(), 0);
        // link + dismiss button
        assert_eq!(doc.activation_count(), 2);
        assert_eq!(doc.url(), "https://site/in/jane/");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_trigger_resolves_empty_without_touching_page() {
        let doc = HtmlDocument::parse("https://site/in/jane/", "<main><section><h2>J</h2></section></main>");

        let text = extractor().extract(&doc).await;

        assert_eq!(text, "");
        assert_eq!(doc.activation_count(), 0);
        assert_eq!(doc.back_navigation_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_found_by_visible_text() {
        let doc = HtmlDocument::parse(
            "https://site/in/jane/",
            r#"<main><section><a href="/elsewhere"> Contact info </a></section></main>"#,
        );
        doc.on_activate(
            "a",
            Effect::OpenOverlay {
                parent: "body".to_string(),
                html: OVERLAY.to_string(),
            },
        )
        .unwrap();

        let text = extractor().extract(&doc).await;
        assert!(text.starts_with("Email: a@b.com"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_navigates_back_once() {
        let doc = HtmlDocument::parse("https://site/in/jane/", PROFILE);

        let started = tokio::time::Instant::now();
        let text = extractor().extract(&doc).await;

        assert_eq!(text, "");
        assert_eq!(doc.back_navigation_count(), 1);
        assert!(started.elapsed() >= Duration::from_millis(5_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_preexisting_columns_are_ignored() {
        let doc = HtmlDocument::parse("https://site/in/jane/", PROFILE);
        let text = extractor().extract(&doc).await;
        assert!(!text.contains("Old"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlay_rendered_after_a_delay() {
        let doc = HtmlDocument::parse("https://site/in/jane/", PROFILE);

        let render_later = async {
            sleep(Duration::from_millis(300)).await;
            doc.insert_html("body", r#"<div data-testid="lazy-column"><div componentkey="x"><p>Loading</p></div></div>"#)
                .unwrap();
            sleep(Duration::from_millis(300)).await;
            doc.insert_html("body", OVERLAY).unwrap();
        };
        let contact = extractor();
        let (text, ()) = tokio::join!(contact.extract(&doc), render_later);

        assert_eq!(text, "Email: a@b.com\nPhone: 555-1234");
        assert_eq!(doc.back_navigation_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlay_without_dismiss_control_goes_back() {
        let doc = HtmlDocument::parse("https://site/in/jane/", PROFILE);
        doc.on_activate(
            "a",
            Effect::OpenOverlay {
                parent: "body".to_string(),
                html: r#"<div data-testid="lazy-column"><div componentkey="e"><p>Email</p><p>j@x.io</p></div></div>"#
                    .to_string(),
            },
        )
        .unwrap();

        let text = extractor().extract(&doc).await;

        assert_eq!(text, "Email: j@x.io");
        assert_eq!(doc.back_navigation_count(), 1);
        assert!(!doc.has_open_overlay());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_failure_still_closes_overlay() {
        let doc = profile_with_overlay();
        let mut config = ExtractorConfig::default();
        config.patterns.overlay_item = "div>>>!".to_string();

        let text = ContactOverlayExtractor::new(&config).extract(&doc).await;

        assert_eq!(text, "");
        assert!(!doc.has_open_overlay());
        assert_eq!(doc.url(), "https://site/in/jane/");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unusable_dismiss_selector_falls_back_to_back() {
        let doc = profile_with_overlay();
        let mut config = ExtractorConfig::default();
        config.patterns.dismiss_control = "button[".to_string();

        let text = ContactOverlayExtractor::new(&config).extract(&doc).await;

        assert_eq!(text, "Email: a@b.com\nPhone: 555-1234");
        assert!(!doc.has_open_overlay());
        assert_eq!(doc.back_navigation_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_prefers_dismiss_over_close_label() {
        let doc = HtmlDocument::parse(
            "https://site/in/jane/",
            r#"<body>
                 <button aria-label="Close chat">c</button>
                 <button aria-label="dismiss dialog">d</button>
               </body>"#,
        );
        doc.on_activate("button[aria-label=\"Close chat\"]", Effect::DismissOverlay).unwrap();
        doc.insert_html("body", "<div>overlay</div>").unwrap();

        extractor().close_overlay(&doc).unwrap();

        // The close-chat reaction never ran, so the overlay is still open.
        assert!(doc.has_open_overlay());
        assert_eq!(doc.activation_count(), 1);
        assert_eq!(doc.back_navigation_count(), 0);
    }
}
