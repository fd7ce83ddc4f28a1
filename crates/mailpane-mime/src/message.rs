//! MIME message tree parsing.
//!
//! A raw message becomes an arena of [`MimeNode`]s indexed by
//! [`NodeId`], with explicit child-index lists preserving document
//! order. Parsing is a single pass over owned data; the resulting
//! [`ParsedMessage`] is immutable.

use crate::address::{Address, parse_address_field};
use crate::charset;
use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::headers::Headers;
use std::fmt;
use tracing::{debug, warn};

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    ///
    /// Unrecognized values behave as `8bit` (pass-through) rather than
    /// being rejected.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "7bit" => Self::SevenBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::EightBit,
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Index of a node within a [`ParsedMessage`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Fully decoded body content of a leaf part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContent {
    /// Unicode text (`text/*` parts after transfer and charset decoding).
    Text(String),
    /// Raw bytes after transfer decoding, for non-text parts.
    Binary(Vec<u8>),
}

impl BodyContent {
    /// Returns the text content, if this is a text body.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

/// One MIME part.
#[derive(Debug, Clone)]
pub struct MimeNode {
    /// Decoded headers of this part.
    pub headers: Headers,
    /// Parsed content type (defaulted when the header is absent).
    pub content_type: ContentType,
    /// Declared transfer encoding.
    pub transfer_encoding: TransferEncoding,
    /// Undecoded body bytes (empty for multipart containers).
    pub raw_body: Vec<u8>,
    /// Decoded content; `None` for multipart containers.
    pub content: Option<BodyContent>,
    /// Child parts, in document order.
    pub children: Vec<NodeId>,
}

impl MimeNode {
    /// Checks if this node is a multipart container.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type.is_multipart()
    }

    /// Returns the decoded text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(BodyContent::as_text)
    }
}

/// An immutable parsed message: the node arena plus pre-extracted
/// header fields for display.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    nodes: Vec<MimeNode>,
    root: NodeId,
    /// Decoded From field.
    pub from: Option<Address>,
    /// Decoded To field.
    pub to: Option<Address>,
    /// Decoded Subject field.
    pub subject: Option<String>,
    /// Raw Date field value.
    pub date: Option<String>,
}

impl ParsedMessage {
    /// Identifier of the root node.
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &MimeNode {
        &self.nodes[self.root.0]
    }

    /// Looks up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this message.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &MimeNode {
        &self.nodes[id.0]
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf node ids in document order.
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(self.root, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = &self.nodes[id.0];
        if node.children.is_empty() {
            out.push(id);
        } else {
            for &child in &node.children {
                self.collect_leaves(child, out);
            }
        }
    }
}

/// Default multipart recursion cap.
const DEFAULT_MAX_DEPTH: usize = 100;

/// Parser for raw RFC 5322 messages.
///
/// Stateless between calls: each `parse` operates only on data it owns.
#[derive(Debug, Clone, Copy)]
pub struct MessageParser {
    max_depth: usize,
}

impl Default for MessageParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MessageParser {
    /// Creates a parser with a custom multipart recursion cap.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Parses one complete message.
    ///
    /// Parsing degrades gracefully: malformed sub-parts become opaque
    /// leaves, encoding problems fall back to lossy decodes. Only a
    /// structural failure of the top-level entity itself is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the top-level entity cannot be parsed at all.
    pub fn parse(&self, raw: &str) -> Result<ParsedMessage> {
        let mut nodes = Vec::new();
        let root = self.parse_entity(&mut nodes, raw, 0)?;

        let root_headers = &nodes[root.0].headers;
        let from = root_headers.get("from").and_then(parse_address_field);
        let to = root_headers.get("to").and_then(parse_address_field);
        let subject = root_headers.get("subject").map(str::to_string);
        let date = root_headers.get("date").map(str::to_string);

        debug!(nodes = nodes.len(), "parsed message");

        Ok(ParsedMessage {
            nodes,
            root,
            from,
            to,
            subject,
            date,
        })
    }

    fn parse_entity(&self, nodes: &mut Vec<MimeNode>, raw: &str, depth: usize) -> Result<NodeId> {
        if depth > self.max_depth {
            return Err(Error::NestingTooDeep(self.max_depth));
        }

        let (header_text, body) = split_header_block(raw);
        let headers = Headers::parse(header_text);

        let mut content_type = headers
            .get("content-type")
            .and_then(|v| ContentType::parse(v).ok())
            .unwrap_or_else(ContentType::default_text_plain);
        let transfer_encoding = headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse);

        if content_type.is_multipart() {
            if let Some(boundary) = content_type.boundary().map(str::to_string) {
                let id = NodeId(nodes.len());
                nodes.push(MimeNode {
                    headers,
                    content_type,
                    transfer_encoding,
                    raw_body: Vec::new(),
                    content: None,
                    children: Vec::new(),
                });

                let mut children = Vec::new();
                for segment in split_multipart(body, &boundary) {
                    match self.parse_entity(nodes, segment, depth + 1) {
                        Ok(child) => children.push(child),
                        Err(err) => {
                            // Contained failure: this sub-part only
                            warn!("sub-part degraded to opaque leaf: {err}");
                            children.push(push_opaque_leaf(nodes, segment));
                        }
                    }
                }
                nodes[id.0].children = children;
                return Ok(id);
            }

            // Declared multipart without a boundary cannot be split;
            // degrade to an opaque leaf instead of failing the message.
            warn!("multipart part without boundary parameter, treating as opaque leaf");
            content_type = ContentType::application_octet_stream();
        }

        let raw_body = body.as_bytes().to_vec();
        let decoded = match transfer_encoding {
            TransferEncoding::Base64 => decode_base64(body),
            TransferEncoding::QuotedPrintable => decode_quoted_printable(&raw_body),
            _ => raw_body.clone(),
        };

        let content = if content_type.is_text() {
            let declared = content_type.charset().unwrap_or("utf-8");
            Some(BodyContent::Text(charset::decode(&decoded, declared)))
        } else {
            Some(BodyContent::Binary(decoded))
        };

        let id = NodeId(nodes.len());
        nodes.push(MimeNode {
            headers,
            content_type,
            transfer_encoding,
            raw_body,
            content,
            children: Vec::new(),
        });
        Ok(id)
    }
}

fn push_opaque_leaf(nodes: &mut Vec<MimeNode>, raw: &str) -> NodeId {
    let id = NodeId(nodes.len());
    let bytes = raw.as_bytes().to_vec();
    nodes.push(MimeNode {
        headers: Headers::new(),
        content_type: ContentType::application_octet_stream(),
        transfer_encoding: TransferEncoding::EightBit,
        raw_body: bytes.clone(),
        content: Some(BodyContent::Binary(bytes)),
        children: Vec::new(),
    });
    id
}

/// Splits an entity into its header block and body at the first blank
/// line. Without a blank line the whole input is the header block.
fn split_header_block(raw: &str) -> (&str, &str) {
    // A leading blank line means an empty header block
    if let Some(body) = raw.strip_prefix("\r\n") {
        return ("", body);
    }
    if let Some(body) = raw.strip_prefix('\n') {
        return ("", body);
    }

    let crlf = raw.find("\r\n\r\n").map(|i| (i, i + 4));
    let lf = raw.find("\n\n").map(|i| (i, i + 2));

    let split = match (crlf, lf) {
        (Some(c), Some(l)) => Some(if c.0 < l.0 { c } else { l }),
        (found, None) | (None, found) => found,
    };

    split.map_or((raw, ""), |(end, body_start)| {
        (&raw[..end], &raw[body_start..])
    })
}

/// Splits a multipart body into part segments along boundary lines.
///
/// Delimiter lines are `--boundary` and `--boundary--` (terminator),
/// compared after stripping the line break and trailing transport
/// padding. Preamble and epilogue are discarded; a missing terminator
/// makes the remaining bytes the last part.
fn split_multipart<'a>(body: &'a str, boundary: &str) -> Vec<&'a str> {
    let open = format!("--{boundary}");
    let close = format!("--{boundary}--");

    let mut segments = Vec::new();
    let mut current_start: Option<usize> = None;
    let mut terminated = false;
    let mut pos = 0;

    for line in body.split_inclusive('\n') {
        let line_start = pos;
        pos += line.len();
        let trimmed = line.trim_end();

        if trimmed == close {
            if let Some(start) = current_start.take() {
                segments.push(trim_boundary_newline(&body[start..line_start]));
            }
            terminated = true;
            break;
        }
        if trimmed == open {
            if let Some(start) = current_start {
                segments.push(trim_boundary_newline(&body[start..line_start]));
            }
            current_start = Some(pos);
        }
    }

    if !terminated && let Some(start) = current_start {
        segments.push(trim_boundary_newline(&body[start..]));
    }

    segments
}

/// The line break preceding a boundary line belongs to the delimiter,
/// not to the part.
fn trim_boundary_newline(segment: &str) -> &str {
    segment
        .strip_suffix("\r\n")
        .or_else(|| segment.strip_suffix('\n'))
        .unwrap_or(segment)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedMessage {
        MessageParser::default().parse(raw).unwrap()
    }

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("BASE64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
        // Unknown encodings pass through as 8bit
        assert_eq!(
            TransferEncoding::parse("x-uuencode"),
            TransferEncoding::EightBit
        );
    }

    #[test]
    fn test_parse_simple_message() {
        let message = parse(concat!(
            "From: Alice <a@example.com>\r\n",
            "To: b@example.com\r\n",
            "Subject: =?UTF-8?B?SGVsbG8=?=\r\n",
            "Date: Thu, 15 Jan 2026 19:31:43 +0000\r\n",
            "\r\n",
            "Hi there\r\n"
        ));

        assert_eq!(message.subject.as_deref(), Some("Hello"));
        assert_eq!(
            message.from,
            Some(Address::Mailbox {
                name: Some("Alice".to_string()),
                address: "a@example.com".to_string()
            })
        );
        assert_eq!(message.root().text(), Some("Hi there\r\n"));
        assert!(message.root().content_type.is("text", "plain"));
    }

    #[test]
    fn test_parse_defaults_without_content_type() {
        let message = parse("Subject: x\r\n\r\nbody");
        let root = message.root();
        assert!(root.content_type.is("text", "plain"));
        assert_eq!(root.content_type.charset(), Some("us-ascii"));
        assert_eq!(root.transfer_encoding, TransferEncoding::SevenBit);
    }

    #[test]
    fn test_parse_base64_body() {
        let message = parse(concat!(
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "SGVsbG8s\r\nIFdvcmxkIQ==\r\n"
        ));
        assert_eq!(message.root().text(), Some("Hello, World!"));
    }

    #[test]
    fn test_parse_quoted_printable_latin1_body() {
        let message = parse(concat!(
            "Content-Type: text/plain; charset=iso-8859-1\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "H=E9llo"
        ));
        assert_eq!(message.root().text(), Some("Héllo"));
    }

    #[test]
    fn test_parse_multipart_tree_in_order() {
        let message = parse(concat!(
            "Content-Type: multipart/mixed; boundary=xyz\r\n",
            "\r\n",
            "preamble to discard\r\n",
            "--xyz\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "one\r\n",
            "--xyz\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "two\r\n",
            "--xyz\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "three\r\n",
            "--xyz--\r\n",
            "epilogue to discard\r\n"
        ));

        let leaves = message.leaf_ids();
        assert_eq!(leaves.len(), 3);
        let texts: Vec<_> = leaves
            .iter()
            .map(|&id| message.node(id).text().unwrap())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert!(message.root().is_multipart());
        assert!(message.root().content.is_none());
    }

    #[test]
    fn test_parse_nested_multipart() {
        let message = parse(concat!(
            "Content-Type: multipart/mixed; boundary=outer\r\n",
            "\r\n",
            "--outer\r\n",
            "Content-Type: multipart/alternative; boundary=inner\r\n",
            "\r\n",
            "--inner\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "plain\r\n",
            "--inner\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>html</p>\r\n",
            "--inner--\r\n",
            "--outer\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "tail\r\n",
            "--outer--\r\n"
        ));

        assert_eq!(message.root().children.len(), 2);
        let alt = message.node(message.root().children[0]);
        assert!(alt.content_type.is("multipart", "alternative"));
        assert_eq!(alt.children.len(), 2);
        assert_eq!(message.leaf_ids().len(), 3);
    }

    #[test]
    fn test_parse_unterminated_boundary_takes_rest() {
        let message = parse(concat!(
            "Content-Type: multipart/mixed; boundary=xyz\r\n",
            "\r\n",
            "--xyz\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "last part without terminator\r\n"
        ));

        let leaves = message.leaf_ids();
        assert_eq!(leaves.len(), 1);
        assert_eq!(
            message.node(leaves[0]).text(),
            Some("last part without terminator\r\n")
        );
    }

    #[test]
    fn test_parse_multipart_missing_boundary_degrades() {
        let message = parse(concat!(
            "Content-Type: multipart/mixed\r\n",
            "\r\n",
            "opaque bytes\r\n"
        ));

        let root = message.root();
        assert!(!root.is_multipart());
        assert!(root.children.is_empty());
        assert!(matches!(root.content, Some(BodyContent::Binary(_))));
    }

    #[test]
    fn test_parse_depth_cap_degrades_subpart_only() {
        let mut entity = String::from("Content-Type: text/plain\r\n\r\nleaf");
        for i in 0..110 {
            entity = format!(
                "Content-Type: multipart/mixed; boundary=b{i}\r\n\r\n--b{i}\r\n{entity}\r\n--b{i}--\r\n"
            );
        }

        // Parses despite exceeding the cap: the too-deep sub-part is
        // replaced by an opaque leaf instead of failing the message.
        let message = MessageParser::default().parse(&entity).unwrap();
        let leaves = message.leaf_ids();
        assert_eq!(leaves.len(), 1);
        assert!(matches!(
            message.node(leaves[0]).content,
            Some(BodyContent::Binary(_))
        ));
    }

    #[test]
    fn test_parse_lf_only_line_endings() {
        let message = parse("Content-Type: multipart/mixed; boundary=q\n\n--q\n\nhi\n--q--\n");
        let leaves = message.leaf_ids();
        assert_eq!(leaves.len(), 1);
        assert_eq!(message.node(leaves[0]).text(), Some("hi"));
    }
}
