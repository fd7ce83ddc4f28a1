//! HTML sanitization.
//!
//! Rewrites untrusted email HTML under a strict allow-list: script
//! execution and event handlers are removed unconditionally, while
//! structural and styling markup (including inline `style`, `<style>`
//! elements, `src`/`href`/`srcset`) is retained so the message still
//! looks like the sender intended. The output is meant to be displayed
//! inside the isolation boundary described in [`crate::isolation`],
//! which owns the residual risk of retained CSS.
//!
//! Sanitization is deterministic and idempotent: re-sanitizing output
//! yields the same output.

use ammonia::Builder;
use std::collections::HashSet;
use tracing::debug;

/// HTML guaranteed free of executable constructs, ready for an isolated
/// rendering context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedDocument {
    /// The sanitized markup.
    pub html: String,
    /// Where the markup came from.
    pub origin: DocumentOrigin,
}

/// Origin of a sanitized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// Sanitized from an HTML body.
    Html,
    /// Synthesized from a plain-text body; cannot contain markup.
    PlainText,
}

fn sanitizer() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        // <style> content is kept for visual fidelity; the isolation
        // boundary prevents CSS from reaching the host page
        .rm_clean_content_tags(["style"])
        .add_tags(["style", "center", "font"])
        .add_generic_attributes([
            "style", "class", "id", "align", "valign", "width", "height", "border", "bgcolor",
            "color", "cellpadding", "cellspacing",
        ])
        .add_tag_attributes("img", ["srcset"])
        .add_tag_attributes("font", ["face", "size"])
        .add_tag_attributes("a", ["target"])
        .url_schemes(HashSet::from(["http", "https", "mailto", "tel", "data"]))
        // Hyperlink activation opens a new top-level context instead of
        // navigating the isolation boundary itself
        .set_tag_attribute_value("a", "target", "_blank")
        .link_rel(Some("noopener noreferrer"))
        // data: stays available for inline images but never for
        // navigation
        .attribute_filter(|element, attribute, value| {
            let navigational = element == "a" || element == "area";
            if navigational
                && attribute == "href"
                && value.trim_start().to_ascii_lowercase().starts_with("data:")
            {
                return None;
            }
            Some(value.into())
        });
    builder
}

/// Sanitizes an HTML body into a display-ready document.
///
/// Unknown tags are dropped but their text content is preserved;
/// scripts, event handlers and `javascript:` URLs are removed
/// unconditionally.
#[must_use]
pub fn sanitize_html(html: &str) -> SanitizedDocument {
    let clean = sanitizer().clean(html).to_string();
    debug!(
        input_len = html.len(),
        output_len = clean.len(),
        "sanitized html body"
    );
    SanitizedDocument {
        html: clean,
        origin: DocumentOrigin::Html,
    }
}

/// Synthesizes a document from a plain-text body.
///
/// All HTML-significant characters are escaped and the result is
/// wrapped in a fixed-width preformatted container; this path cannot
/// introduce markup.
#[must_use]
pub fn text_to_html(text: &str) -> SanitizedDocument {
    let escaped = html_escape::encode_text(text);
    SanitizedDocument {
        html: format!(
            "<pre style=\"white-space: pre-wrap; font-family: monospace;\">{escaped}</pre>"
        ),
        origin: DocumentOrigin::PlainText,
    }
}
