//! The page as the extractors see it

use crate::error::ExtractorError;
use std::fmt::Debug;
use std::hash::Hash;
use tokio::sync::watch;

/// Receiver side of a document's mutation feed.
///
/// The value is a generation counter bumped on every structural change; only
/// the fact that it changed matters.
pub type MutationReceiver = watch::Receiver<u64>;

/// A live page: read-only traversal plus the few interactions the contact
/// overlay needs.
///
/// Selectors are CSS selector strings. Node handles are cheap copyable
/// identities, so a set of them can be taken as a baseline and compared
/// against later queries.
pub trait DocumentView {
    /// Identity of an element in this document
    type Node: Copy + Eq + Hash + Debug;

    /// Current page URL
    fn url(&self) -> String;

    /// All elements matching `selector`, in document order, below `scope`
    /// (or in the whole document when `scope` is `None`)
    fn select_all(
        &self,
        scope: Option<Self::Node>,
        selector: &str,
    ) -> Result<Vec<Self::Node>, ExtractorError>;

    /// First element matching `selector` below `scope`
    fn select_first(
        &self,
        scope: Option<Self::Node>,
        selector: &str,
    ) -> Result<Option<Self::Node>, ExtractorError> {
        Ok(self.select_all(scope, selector)?.into_iter().next())
    }

    /// Concatenated text of all descendant text nodes
    fn text_content(&self, node: Self::Node) -> String;

    /// Rendered text, one line per block-level box
    fn inner_text(&self, node: Self::Node) -> String;

    /// Attribute value, if present
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Simulate a user activating (clicking) `node`
    fn activate(&self, node: Self::Node);

    /// Simulate the browser's back action
    fn navigate_back(&self);

    /// Subscribe to structural changes made after this call
    fn subscribe(&self) -> MutationReceiver;
}
