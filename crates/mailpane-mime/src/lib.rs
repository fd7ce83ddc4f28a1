//! # mailpane-mime
//!
//! Lenient MIME decoding for untrusted email messages.
//!
//! ## Features
//!
//! - **Tree parsing**: multipart messages become an arena-backed tree of
//!   parts in document order, with a recursion cap against adversarial
//!   nesting
//! - **Transfer decoding**: Base64 and Quoted-Printable, tolerant of the
//!   malformed input real messages carry
//! - **Charset decoding**: `text/*` bodies decoded to Unicode via
//!   `encoding_rs`, with lossy fallbacks instead of hard failures
//! - **Header decoding**: RFC 2047 encoded-words and structured address
//!   lists
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailpane_mime::MessageParser;
//!
//! let raw = "From: sender@example.com\r\n\
//!            Subject: =?UTF-8?B?SGVsbG8=?=\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            Hello, World!";
//!
//! let message = MessageParser::default().parse(raw)?;
//! assert_eq!(message.subject.as_deref(), Some("Hello"));
//! println!("Body: {:?}", message.root().text());
//! ```
//!
//! The parser never fails on encoding problems: bad base64, invalid
//! charset bytes and malformed encoded-words all degrade to best-effort
//! output, because the input is untrusted and frequently non-conformant.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod error;
mod headers;
mod message;

pub mod charset;
pub mod encoding;

pub use address::{Address, parse_address_field, parse_address_list};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use headers::Headers;
pub use message::{BodyContent, MessageParser, MimeNode, NodeId, ParsedMessage, TransferEncoding};
