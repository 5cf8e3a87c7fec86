//! Field extraction from the rendered profile page

use crate::config::{CompiledPatterns, ExtractorConfig, PagePatterns};
use crate::document::DocumentView;
use crate::error::ExtractorError;
use regex::Regex;
use rolodex_domain::{ProfileRecord, MIDDOT};
use tracing::{debug, warn};

/// Reads the top card, about and experience sections into a [`ProfileRecord`].
///
/// Extraction never fails: missing page structure leaves fields empty, and any
/// other failure is logged and the fields gathered so far are returned.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    patterns: PagePatterns,
    compiled: CompiledPatterns,
    about_max_chars: usize,
}

impl FieldExtractor {
    /// Create a new FieldExtractor
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Ok(Self {
            patterns: config.patterns.clone(),
            compiled: config.patterns.compile()?,
            about_max_chars: config.about_max_chars,
        })
    }

    /// Extract every field the page offers
    pub fn extract<D: DocumentView>(&self, doc: &D) -> ProfileRecord {
        let mut record = ProfileRecord::for_url(&doc.url());
        if let Err(e) = self.populate(doc, &mut record) {
            warn!(error = %e, "Profile extraction stopped early, returning partial record");
        }
        record
    }

    fn populate<D: DocumentView>(
        &self,
        doc: &D,
        record: &mut ProfileRecord,
    ) -> Result<(), ExtractorError> {
        let p = &self.patterns;

        let Some(main) = doc.select_first(None, &p.primary_region)? else {
            debug!("No primary content region on page");
            return Ok(());
        };
        let Some(top) = doc.select_first(Some(main), &p.section)? else {
            debug!("Primary content region has no sections");
            return Ok(());
        };

        self.read_top_card(doc, top, record)?;

        for section in doc.select_all(None, &p.section)? {
            let Some(heading) = self.section_heading(doc, section)? else {
                continue;
            };
            let heading = squashed_text(doc, heading);
            let key = heading.to_lowercase();

            if key == p.about_heading && record.about.is_empty() {
                let text = doc.inner_text(section);
                record.about = clean_about(
                    &text,
                    &heading,
                    &self.compiled.boilerplate,
                    self.about_max_chars,
                );
            }

            if key == p.experience_heading && record.current_title.is_empty() {
                let lines = rendered_lines(&doc.inner_text(section));
                if let Some((title, company)) = find_current_role(
                    &lines,
                    &self.compiled.date,
                    &heading,
                    &p.pagination_artifacts,
                ) {
                    record.current_title = title;
                    record.current_company = company;
                }
            }
        }

        if record.current_company.is_empty() {
            if let Some(link) = doc.select_first(Some(top), &p.company_link)? {
                record.current_company = squashed_text(doc, link);
            }
        }

        Ok(())
    }

    fn read_top_card<D: DocumentView>(
        &self,
        doc: &D,
        top: D::Node,
        record: &mut ProfileRecord,
    ) -> Result<(), ExtractorError> {
        let p = &self.patterns;

        if let Some(name) = doc.select_first(Some(top), &p.name_heading)? {
            record.name = squashed_text(doc, name);
        }

        let paragraphs: Vec<String> = doc
            .select_all(Some(top), &p.paragraph)?
            .into_iter()
            .map(|node| squashed_text(doc, node))
            .collect();
        if let Some(headline) = pick_headline(&paragraphs) {
            record.headline = headline.to_string();
        }

        let lines = rendered_lines(&doc.inner_text(top));
        if let Some(location) = find_location(&lines, &p.contact_label) {
            record.set_location(location);
        }

        Ok(())
    }

    /// First heading candidate present in `section`, by selector priority
    fn section_heading<D: DocumentView>(
        &self,
        doc: &D,
        section: D::Node,
    ) -> Result<Option<D::Node>, ExtractorError> {
        for selector in &self.patterns.section_headings {
            if let Some(heading) = doc.select_first(Some(section), selector)? {
                return Ok(Some(heading));
            }
        }
        Ok(None)
    }
}

/// Trimmed, non-empty lines of rendered text
pub(crate) fn rendered_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_separator(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(MIDDOT) && chars.next().is_none()
}

/// The first paragraph that reads like a headline rather than a pill separator
pub(crate) fn pick_headline(paragraphs: &[String]) -> Option<&str> {
    paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| p.chars().count() > 1)
        .find(|p| !p.starts_with(MIDDOT) && p.chars().count() > 2)
}

/// The line right above the contact-info label.
///
/// A bare separator there is skipped once; several separators in a row are
/// not walked back further.
pub(crate) fn find_location(lines: &[String], contact_label: &str) -> Option<String> {
    let idx = lines.iter().position(|line| line == contact_label)?;
    if idx == 0 {
        return None;
    }
    let mut location = &lines[idx - 1];
    if is_separator(location) && idx > 1 {
        location = &lines[idx - 2];
    }
    Some(location.clone())
}

/// Text of `node` with whitespace runs collapsed, as a browser renders it
fn squashed_text<D: DocumentView>(doc: &D, node: D::Node) -> String {
    doc.text_content(node)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove trailing expander text ("…see more", "Show less", ...).
///
/// Applying it twice gives the same result as applying it once.
pub fn strip_boilerplate(text: &str, boilerplate: &Regex) -> String {
    boilerplate.replace(text, "").trim().to_string()
}

/// About text without its heading and expander, capped at `max_chars`
pub(crate) fn clean_about(
    section_text: &str,
    heading: &str,
    boilerplate: &Regex,
    max_chars: usize,
) -> String {
    let mut text = section_text.trim();
    if let Some(rest) = text.strip_prefix(heading) {
        text = rest.trim();
    }
    let stripped = strip_boilerplate(text, boilerplate);
    stripped.chars().take(max_chars).collect()
}

/// Title and company of the first dated experience entry.
///
/// The two lines above a date line are the title and the company. Candidates
/// whose title line is exactly the section heading as rendered, or a
/// pagination control, are skipped.
pub(crate) fn find_current_role(
    lines: &[String],
    date: &Regex,
    heading: &str,
    artifacts: &[String],
) -> Option<(String, String)> {
    for (i, line) in lines.iter().enumerate() {
        if !date.is_match(line) {
            continue;
        }
        let company = if i >= 1 { lines[i - 1].as_str() } else { "" };
        let title = if i >= 2 { lines[i - 2].as_str() } else { "" };

        if title.is_empty()
            || title == heading
            || artifacts.iter().any(|a| title.contains(a.as_str()))
        {
            continue;
        }

        let company = company.split(MIDDOT).next().unwrap_or_default().trim();
        return Some((title.to_string(), company.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn compiled() -> CompiledPatterns {
        PagePatterns::default().compile().unwrap()
    }

    #[test]
    fn test_headline_skips_separator_paragraphs() {
        let paragraphs = lines(&["·", "\u{00B7} 500+ connections", "Staff Engineer at Acme"]);
        assert_eq!(pick_headline(&paragraphs), Some("Staff Engineer at Acme"));
    }

    #[test]
    fn test_headline_requires_more_than_two_chars() {
        let paragraphs = lines(&["he", "Hi!"]);
        assert_eq!(pick_headline(&paragraphs), Some("Hi!"));
        assert_eq!(pick_headline(&lines(&["ab", "·"])), None);
    }

    #[test]
    fn test_location_above_contact_label() {
        let top = lines(&["Jane Doe", "Engineer", "Austin, Texas, United States", "Contact info"]);
        assert_eq!(
            find_location(&top, "Contact info").as_deref(),
            Some("Austin, Texas, United States")
        );
    }

    #[test]
    fn test_location_steps_over_one_separator() {
        let top = lines(&["Jane Doe", "Berlin, Germany", "·", "Contact info"]);
        assert_eq!(find_location(&top, "Contact info").as_deref(), Some("Berlin, Germany"));
    }

    #[test]
    fn test_location_steps_back_only_once() {
        let top = lines(&["Berlin, Germany", "·", "·", "Contact info"]);
        assert_eq!(find_location(&top, "Contact info").as_deref(), Some("·"));
    }

    #[test]
    fn test_location_missing_label_or_predecessor() {
        assert_eq!(find_location(&lines(&["Jane", "Berlin"]), "Contact info"), None);
        assert_eq!(find_location(&lines(&["Contact info"]), "Contact info"), None);
        assert_eq!(
            find_location(&lines(&["·", "Contact info"]), "Contact info").as_deref(),
            Some("·")
        );
    }

    #[test]
    fn test_about_strips_heading_and_expander() {
        let boilerplate = compiled().boilerplate;
        let about = clean_about(
            "About\nI build reliable systems.\u{2026}see more",
            "About",
            &boilerplate,
            500,
        );
        assert_eq!(about, "I build reliable systems.");

        let about = clean_about("About\nShort bio Show less", "About", &boilerplate, 500);
        assert_eq!(about, "Short bio");
    }

    #[test]
    fn test_about_truncates() {
        let boilerplate = compiled().boilerplate;
        let long = format!("About\n{}", "x".repeat(900));
        let about = clean_about(&long, "About", &boilerplate, 500);
        assert_eq!(about.chars().count(), 500);
    }

    #[test]
    fn test_strip_removes_stacked_expanders() {
        let boilerplate = compiled().boilerplate;
        assert_eq!(strip_boilerplate("bio see more ...see more", &boilerplate), "bio");
        assert_eq!(strip_boilerplate("see more about me", &boilerplate), "see more about me");
    }

    #[test]
    fn test_current_role_from_dated_entry() {
        let section = lines(&[
            "Experience",
            "Senior Engineer",
            "Acme Corp · Full-time",
            "Jan 2020 \u{2013} Present",
            "Austin, Texas",
        ]);
        let c = compiled();
        let role = find_current_role(&section, &c.date, "Experience", &PagePatterns::default().pagination_artifacts);
        assert_eq!(role, Some(("Senior Engineer".to_string(), "Acme Corp".to_string())));
    }

    #[test]
    fn test_current_role_skips_pagination_artifacts() {
        let section = lines(&[
            "Show all experiences",
            "Acme Corp",
            "Mar 2021 - Present",
            "Staff Engineer",
            "Globex",
            "Feb 2018 - Mar 2021",
        ]);
        let c = compiled();
        let role = find_current_role(&section, &c.date, "Experience", &PagePatterns::default().pagination_artifacts);
        assert_eq!(role, Some(("Staff Engineer".to_string(), "Globex".to_string())));
    }

    #[test]
    fn test_current_role_skips_heading_as_title() {
        let section = lines(&["Experience", "Acme", "Jan 2020 - Present"]);
        let c = compiled();
        let role = find_current_role(&section, &c.date, "Experience", &[]);
        assert_eq!(role, None);
    }

    #[test]
    fn test_current_role_heading_match_is_exact() {
        let section = lines(&["EXPERIENCE", "Acme", "Jan 2020 - Present"]);
        let c = compiled();
        let role = find_current_role(&section, &c.date, "Experience", &[]);
        assert_eq!(role, Some(("EXPERIENCE".to_string(), "Acme".to_string())));
    }

    #[test]
    fn test_current_role_none_without_dates() {
        let section = lines(&["Experience", "Engineer", "Acme"]);
        let c = compiled();
        assert_eq!(find_current_role(&section, &c.date, "Experience", &[]), None);
    }

    proptest! {
        #[test]
        fn prop_about_never_exceeds_limit(body in "\\PC{0,1200}") {
            let boilerplate = compiled().boilerplate;
            let about = clean_about(&body, "About", &boilerplate, 500);
            prop_assert!(about.chars().count() <= 500);
        }

        #[test]
        fn prop_strip_is_idempotent(
            body in "[a-zA-Z .\u{2026}]{0,80}",
            tail in prop::sample::select(vec!["", " see more", "...see more", "\u{2026} see more", " Show less", " show MORE"]),
        ) {
            let boilerplate = compiled().boilerplate;
            let input = format!("{body}{tail}");
            let once = strip_boilerplate(&input, &boilerplate);
            let twice = strip_boilerplate(&once, &boilerplate);
            prop_assert_eq!(once, twice);
        }
    }
}
