//! # mailpane-view
//!
//! Safe display pipeline for untrusted email messages.
//!
//! Sits between [`mailpane_mime`]'s parsed tree and the screen: picks
//! the single best renderable body (HTML preferred, plain text
//! fallback), rewrites HTML under a strict allow-list so it carries no
//! executable content, and specifies the isolation contract the
//! embedding renderer must uphold.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailpane_view::{IsolationPolicy, view_message};
//!
//! let view = view_message(raw_eml)?;
//! println!("From: {}", view.from.as_deref().unwrap_or("(unknown)"));
//!
//! let policy = IsolationPolicy::default();
//! host.embed(&view.document.html, &policy.sandbox_attribute());
//! ```
//!
//! The pipeline is a pure in-memory transform: no network, no disk, no
//! state between calls. The only user-visible failure is
//! [`Error::NoRenderableBody`]; everything else degrades gracefully.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod isolation;
mod sanitize;
mod select;
mod view;

pub use error::{Error, Result};
pub use isolation::IsolationPolicy;
pub use sanitize::{DocumentOrigin, SanitizedDocument, sanitize_html, text_to_html};
pub use select::{BodySelection, select_bodies};
pub use view::{MessageView, render_body, view_message};
