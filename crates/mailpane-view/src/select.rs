//! Body selection.
//!
//! Walks the MIME tree once to pick the single best renderable bodies.
//! `multipart/alternative` lists alternatives in increasing order of
//! preference, so the last matching child wins there; other containers
//! encode no preference and the first leaf found in document order wins.

use mailpane_mime::{NodeId, ParsedMessage};

/// The renderable bodies found in a message tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodySelection<'a> {
    /// Best `text/html` body, if any.
    pub html: Option<&'a str>,
    /// Best `text/plain` body, if any.
    pub text: Option<&'a str>,
}

impl BodySelection<'_> {
    /// Checks whether anything renderable was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.html.is_none() && self.text.is_none()
    }
}

/// Selects the best HTML and plain-text bodies from a parsed message.
#[must_use]
pub fn select_bodies(message: &ParsedMessage) -> BodySelection<'_> {
    select_in(message, message.root_id())
}

fn select_in(message: &ParsedMessage, id: NodeId) -> BodySelection<'_> {
    let node = message.node(id);
    let mut selection = BodySelection::default();

    if node.is_multipart() {
        let last_wins = node.content_type.is("multipart", "alternative");
        for &child in &node.children {
            let found = select_in(message, child);
            if last_wins {
                selection.html = found.html.or(selection.html);
                selection.text = found.text.or(selection.text);
            } else {
                selection.html = selection.html.or(found.html);
                selection.text = selection.text.or(found.text);
            }
        }
    } else if node.content_type.is("text", "html") {
        selection.html = node.text();
    } else if node.content_type.is("text", "plain") {
        selection.text = node.text();
    }

    selection
}
