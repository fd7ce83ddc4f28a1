//! The one-call display pipeline.

use crate::error::{Error, Result};
use crate::sanitize::{SanitizedDocument, sanitize_html, text_to_html};
use crate::select::select_bodies;
use chrono::{DateTime, Local};
use mailpane_mime::{MessageParser, ParsedMessage};
use tracing::debug;

/// Display-ready rendition of one message: header fields as plain text
/// plus the sanitized body document.
#[derive(Debug, Clone)]
pub struct MessageView {
    /// Sender, formatted for display.
    pub from: Option<String>,
    /// Recipients, formatted for display.
    pub to: Option<String>,
    /// Decoded subject.
    pub subject: Option<String>,
    /// Date, reformatted to local time when parseable.
    pub date: Option<String>,
    /// Sanitized body document.
    pub document: SanitizedDocument,
}

/// Runs the full pipeline on one raw message: parse, select the best
/// body, sanitize it.
///
/// # Errors
///
/// Returns an error if the top-level message cannot be parsed or if
/// neither an HTML nor a plain-text leaf exists anywhere in the tree.
pub fn view_message(raw: &str) -> Result<MessageView> {
    let message = MessageParser::default().parse(raw)?;
    let document = render_body(&message)?;

    Ok(MessageView {
        from: message.from.as_ref().map(ToString::to_string),
        to: message.to.as_ref().map(ToString::to_string),
        subject: message.subject.clone(),
        date: message.date.as_deref().map(format_date_local),
        document,
    })
}

/// Selects and sanitizes the best renderable body of a parsed message.
///
/// # Errors
///
/// Returns [`Error::NoRenderableBody`] when the tree holds neither an
/// HTML nor a plain-text leaf.
pub fn render_body(message: &ParsedMessage) -> Result<SanitizedDocument> {
    let selection = select_bodies(message);
    debug!(
        has_html = selection.html.is_some(),
        has_text = selection.text.is_some(),
        "selected message body"
    );

    if let Some(html) = selection.html {
        return Ok(sanitize_html(html));
    }
    if let Some(text) = selection.text {
        return Ok(text_to_html(text));
    }
    Err(Error::NoRenderableBody)
}

/// Formats an RFC 2822 date string to local time.
///
/// Converts dates like "Thu, 15 Jan 2026 19:31:43 +0000" to the local
/// timezone; unparseable values are returned unchanged.
fn format_date_local(value: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        let local: DateTime<Local> = dt.with_timezone(&Local);
        return local.format("%a, %d %b %Y %H:%M:%S").to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let local: DateTime<Local> = dt.with_timezone(&Local);
        return local.format("%a, %d %b %Y %H:%M:%S").to_string();
    }

    value.to_string()
}
