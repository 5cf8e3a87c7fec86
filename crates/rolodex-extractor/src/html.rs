//! `scraper`-backed page document
//!
//! [`HtmlDocument`] wraps a parsed HTML page and makes it behave like a live
//! page: fragments can be inserted at runtime, activations can trigger
//! registered reactions (open or dismiss an overlay), and the back action
//! undoes the most recent overlay. Every structural change is published on
//! the mutation feed.

use crate::document::{DocumentView, MutationReceiver};
use crate::error::ExtractorError;
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};
use std::cell::{Cell, RefCell};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Elements whose content is never rendered
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "svg", "head"];

/// Elements rendered as their own block (line) in `inner_text`
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// What happens when an element matching a reaction's trigger is activated
#[derive(Debug, Clone)]
pub enum Effect {
    /// Insert an HTML fragment as the last children of the first element
    /// matching `parent`
    OpenOverlay {
        /// Selector of the container receiving the fragment
        parent: String,
        /// Fragment markup
        html: String,
    },

    /// Remove the most recently inserted fragment and return to the previous URL
    DismissOverlay,
}

#[derive(Debug, Clone)]
struct Reaction {
    trigger: Selector,
    effect: Effect,
}

/// A parsed HTML page with live-page behaviour
pub struct HtmlDocument {
    dom: RefCell<Html>,
    location: RefCell<String>,
    history: RefCell<Vec<String>>,
    overlays: RefCell<Vec<Vec<NodeId>>>,
    reactions: RefCell<Vec<Reaction>>,
    mutations: watch::Sender<u64>,
    activations: Cell<usize>,
    back_navigations: Cell<usize>,
}

impl HtmlDocument {
    /// Parse a full page served at `url`
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        let (mutations, _) = watch::channel(0);
        Self {
            dom: RefCell::new(Html::parse_document(html)),
            location: RefCell::new(url.into()),
            history: RefCell::new(Vec::new()),
            overlays: RefCell::new(Vec::new()),
            reactions: RefCell::new(Vec::new()),
            mutations,
            activations: Cell::new(0),
            back_navigations: Cell::new(0),
        }
    }

    /// Register a reaction to activations of elements matching `trigger`
    pub fn on_activate(&self, trigger: &str, effect: Effect) -> Result<(), ExtractorError> {
        let trigger = parse_selector(trigger)?;
        self.reactions.borrow_mut().push(Reaction { trigger, effect });
        Ok(())
    }

    /// Insert `html` into the first element matching `parent` (falling back to
    /// the document root) and publish a mutation.
    ///
    /// Returns the ids of the inserted top-level nodes.
    pub fn insert_html(&self, parent: &str, html: &str) -> Result<Vec<NodeId>, ExtractorError> {
        let parent_selector = parse_selector(parent)?;
        let fragment = Html::parse_fragment(html);

        let inserted = {
            let mut dom = self.dom.borrow_mut();
            let target = dom
                .select(&parent_selector)
                .next()
                .map(|el| el.id())
                .unwrap_or_else(|| dom.root_element().id());

            let mut inserted = Vec::new();
            for child in fragment.root_element().children() {
                if let Some(id) = graft(&mut dom.tree, target, child) {
                    inserted.push(id);
                }
            }
            inserted
        };

        debug!(parent, nodes = inserted.len(), "Inserted fragment");
        self.overlays.borrow_mut().push(inserted.clone());
        self.publish();
        Ok(inserted)
    }

    /// Detach the most recently inserted fragment.
    ///
    /// Returns false when nothing was inserted.
    pub fn remove_overlay(&self) -> bool {
        let Some(nodes) = self.overlays.borrow_mut().pop() else {
            return false;
        };
        {
            let mut dom = self.dom.borrow_mut();
            for id in nodes {
                if let Some(mut node) = dom.tree.get_mut(id) {
                    node.detach();
                }
            }
        }
        self.publish();
        true
    }

    /// Number of `activate` calls so far
    pub fn activation_count(&self) -> usize {
        self.activations.get()
    }

    /// Number of `navigate_back` calls so far
    pub fn back_navigation_count(&self) -> usize {
        self.back_navigations.get()
    }

    /// True while an inserted fragment is still attached
    pub fn has_open_overlay(&self) -> bool {
        !self.overlays.borrow().is_empty()
    }

    fn publish(&self) {
        self.mutations.send_modify(|generation| *generation += 1);
    }

    fn follow_link(&self, href: &str) {
        let current = self.location.borrow().clone();
        let next = url::Url::parse(&current)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string());
        self.history.borrow_mut().push(current);
        *self.location.borrow_mut() = next;
    }

    fn restore_location(&self) {
        if let Some(previous) = self.history.borrow_mut().pop() {
            *self.location.borrow_mut() = previous;
        }
    }
}

impl DocumentView for HtmlDocument {
    type Node = NodeId;

    fn url(&self) -> String {
        self.location.borrow().clone()
    }

    fn select_all(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Vec<NodeId>, ExtractorError> {
        let selector = parse_selector(selector)?;
        let dom = self.dom.borrow();
        let found: Vec<NodeId> = match scope {
            Some(id) => match dom.tree.get(id).and_then(ElementRef::wrap) {
                Some(root) => root.select(&selector).map(|el| el.id()).collect(),
                None => Vec::new(),
            },
            None => dom.select(&selector).map(|el| el.id()).collect(),
        };
        Ok(found)
    }

    fn text_content(&self, node: NodeId) -> String {
        let dom = self.dom.borrow();
        let text: String = dom
            .tree
            .get(node)
            .and_then(ElementRef::wrap)
            .map(|el| el.text().collect())
            .unwrap_or_default();
        text
    }

    fn inner_text(&self, node: NodeId) -> String {
        let dom = self.dom.borrow();
        let Some(root) = dom.tree.get(node) else {
            return String::new();
        };
        let mut raw = String::new();
        render_text(root, false, &mut raw);
        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let dom = self.dom.borrow();
        let value = dom
            .tree
            .get(node)
            .and_then(ElementRef::wrap)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string);
        value
    }

    fn activate(&self, node: NodeId) {
        self.activations.set(self.activations.get() + 1);

        let (href, effects) = {
            let dom = self.dom.borrow();
            let Some(element) = dom.tree.get(node).and_then(ElementRef::wrap) else {
                warn!(?node, "Activated a node that is not an element");
                return;
            };
            let href = if element.value().name() == "a" {
                element.value().attr("href").map(str::to_string)
            } else {
                None
            };
            let effects: Vec<Effect> = self
                .reactions
                .borrow()
                .iter()
                .filter(|r| r.trigger.matches(&element))
                .map(|r| r.effect.clone())
                .collect();
            (href, effects)
        };

        if let Some(href) = href {
            self.follow_link(&href);
        }

        for effect in effects {
            match effect {
                Effect::OpenOverlay { parent, html } => {
                    if let Err(e) = self.insert_html(&parent, &html) {
                        warn!(error = %e, "Overlay reaction failed");
                    }
                }
                Effect::DismissOverlay => {
                    self.remove_overlay();
                    self.restore_location();
                }
            }
        }
    }

    fn navigate_back(&self) {
        self.back_navigations.set(self.back_navigations.get() + 1);
        self.restore_location();
        self.remove_overlay();
    }

    fn subscribe(&self) -> MutationReceiver {
        self.mutations.subscribe()
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector)
        .map_err(|e| ExtractorError::Selector(selector.to_string(), format!("{:?}", e)))
}

/// Copy `source` and its subtree under `parent`
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
    Some(id)
}

/// Flatten `node` the way a browser's `innerText` does: whitespace inside
/// text collapses to single spaces, and line breaks come only from block
/// boundaries, `<br>`, and `<pre>` content.
fn render_text(node: NodeRef<'_, Node>, in_pre: bool, out: &mut String) {
    match node.value() {
        Node::Text(text) if in_pre => out.push_str(text),
        Node::Text(text) => collapse_whitespace(text, out),
        Node::Element(element) => {
            let name = element.name();
            if SKIPPED_TAGS.contains(&name) || element.attr("hidden").is_some() {
                return;
            }
            if name == "br" {
                out.push('\n');
                return;
            }
            let block = BLOCK_TAGS.contains(&name);
            let in_pre = in_pre || name == "pre";
            if block {
                out.push('\n');
            }
            for child in node.children() {
                render_text(child, in_pre, out);
            }
            if block {
                out.push('\n');
            }
        }
        _ => {
            for child in node.children() {
                render_text(child, in_pre, out);
            }
        }
    }
}

/// Append `text` with every whitespace run (newlines included) as one space
fn collapse_whitespace(text: &str, out: &mut String) {
    let mut last_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <main>
            <section>
              <h2>Jane <span>Doe</span></h2>
              <div>Berlin, Germany <span>·</span></div>
              <p>First line<br>Second   line</p>
              <script>var hidden = 1;</script>
              <a id="contact" href="/in/jane/overlay/contact-info/">Contact info</a>
            </section>
          </main>
        </body></html>
    "#;

    fn page() -> HtmlDocument {
        HtmlDocument::parse("https://site/in/jane/", PAGE)
    }

    #[test]
    fn test_select_and_text() {
        let doc = page();
        let h2 = doc.select_first(None, "h2").unwrap().unwrap();
        assert_eq!(doc.text_content(h2), "Jane Doe");
        assert_eq!(doc.select_all(None, "section").unwrap().len(), 1);
        assert!(doc.select_first(None, "article").unwrap().is_none());
    }

    #[test]
    fn test_scoped_select() {
        let doc = page();
        let main = doc.select_first(None, "main").unwrap().unwrap();
        let links = doc.select_all(Some(main), "a").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(doc.attribute(links[0], "id").as_deref(), Some("contact"));
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let doc = page();
        let result = doc.select_all(None, "a[href*=");
        assert!(matches!(result, Err(ExtractorError::Selector(_, _))));
    }

    #[test]
    fn test_inner_text_breaks_blocks_and_skips_scripts() {
        let doc = page();
        let section = doc.select_first(None, "section").unwrap().unwrap();
        let text = doc.inner_text(section);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Jane Doe",
                "Berlin, Germany ·",
                "First line",
                "Second line",
                "Contact info",
            ]
        );
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn test_inner_text_joins_wrapped_text_nodes() {
        let doc = HtmlDocument::parse(
            "https://site/in/jane/",
            "<section>\n  <div><span>Senior\n      Engineer</span></div>\n  <div>Acme</div>\n  \
             <p>I build\n     reliable   systems.</p>\n  <pre>line one\nline two</pre>\n</section>",
        );
        let section = doc.select_first(None, "section").unwrap().unwrap();
        let text = doc.inner_text(section);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Senior Engineer",
                "Acme",
                "I build reliable systems.",
                "line one",
                "line two",
            ]
        );
    }

    #[test]
    fn test_insert_and_remove_publish_mutations() {
        let doc = page();
        let rx = doc.subscribe();
        assert!(!rx.has_changed().unwrap());

        let inserted = doc
            .insert_html("body", r#"<div data-testid="lazy-column"><p>x</p></div>"#)
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(doc.select_all(None, "[data-testid=\"lazy-column\"]").unwrap().len(), 1);

        assert!(doc.remove_overlay());
        assert!(doc.select_all(None, "[data-testid=\"lazy-column\"]").unwrap().is_empty());
        assert!(!doc.remove_overlay());
    }

    #[test]
    fn test_activation_reaction_opens_overlay_and_follows_link() {
        let doc = page();
        doc.on_activate(
            "a#contact",
            Effect::OpenOverlay {
                parent: "body".to_string(),
                html: r#"<div role="dialog"><button aria-label="Dismiss">x</button></div>"#
                    .to_string(),
            },
        )
        .unwrap();
        doc.on_activate("button[aria-label=\"Dismiss\"]", Effect::DismissOverlay).unwrap();

        let link = doc.select_first(None, "a#contact").unwrap().unwrap();
        doc.activate(link);
        assert_eq!(doc.url(), "https://site/in/jane/overlay/contact-info/");
        assert!(doc.has_open_overlay());

        let close = doc.select_first(None, "button").unwrap().unwrap();
        doc.activate(close);
        assert_eq!(doc.url(), "https://site/in/jane/");
        assert!(!doc.has_open_overlay());
        assert_eq!(doc.activation_count(), 2);
        assert_eq!(doc.back_navigation_count(), 0);
    }

    #[test]
    fn test_navigate_back_closes_overlay() {
        let doc = page();
        doc.insert_html("body", "<div>overlay</div>").unwrap();
        doc.navigate_back();
        assert!(!doc.has_open_overlay());
        assert_eq!(doc.back_navigation_count(), 1);
        assert_eq!(doc.url(), "https://site/in/jane/");
    }
}
