//! Header field handling.
//!
//! Header names are case-insensitive and may repeat; values are stored
//! per name in arrival order. RFC 2047 encoded-words are decoded when
//! the block is parsed, so stored values are final display text.

use crate::encoding::decode_header_value;
use std::collections::HashMap;

/// Collection of decoded header fields.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value, preserving arrival order for duplicates.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        self.headers.entry(name).or_default().push(value.into());
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Gets all values for a header, in arrival order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns an iterator over all header name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Returns the number of header values (duplicates counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.values().map(Vec::len).sum()
    }

    /// Checks whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Parses a raw header block.
    ///
    /// Lines starting with whitespace continue the previous field
    /// (RFC 5322 folding); folded lines are joined with a single space
    /// before encoded-word decoding so that a word split across a fold
    /// still decodes. Lines without a colon are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut headers = Self::new();
        let mut current_name: Option<String> = None;
        let mut current_value = String::new();

        let mut save = |name: Option<String>, value: &str| {
            if let Some(name) = name {
                headers.add(name, decode_header_value(value.trim()));
            }
        };

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            // Continuation line (starts with space or tab)
            if line.starts_with(' ') || line.starts_with('\t') {
                if current_name.is_some() {
                    current_value.push(' ');
                    current_value.push_str(line.trim());
                }
            } else {
                save(current_name.take(), &current_value);
                current_value.clear();

                if let Some((name, value)) = line.split_once(':') {
                    current_name = Some(name.trim().to_string());
                    current_value = value.trim().to_string();
                }
            }
        }

        save(current_name, &current_value);
        headers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_duplicates_preserved_in_order() {
        let mut headers = Headers::new();
        headers.add("Received", "from a");
        headers.add("Received", "from b");
        assert_eq!(headers.get_all("received"), vec!["from a", "from b"]);
        assert_eq!(headers.get("received"), Some("from a"));
    }

    #[test]
    fn test_headers_parse() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
            "\r\n"
        );

        let headers = Headers::parse(text);
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(headers.get("To"), Some("recipient@example.com"));
        assert_eq!(headers.get("Subject"), Some("Test Message"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn test_headers_parse_decodes_encoded_words() {
        let headers = Headers::parse("Subject: =?UTF-8?B?SGVsbG8=?=\r\n\r\n");
        assert_eq!(headers.get("subject"), Some("Hello"));
    }

    #[test]
    fn test_headers_parse_folded_encoded_words() {
        let text = "Subject: =?utf-8?B?SGVs?=\r\n =?utf-8?B?bG8=?=\r\n\r\n";
        let headers = Headers::parse(text);
        assert_eq!(headers.get("subject"), Some("Hello"));
    }

    #[test]
    fn test_headers_parse_skips_malformed_lines() {
        let headers = Headers::parse("garbage without colon\r\nSubject: ok\r\n\r\n");
        assert_eq!(headers.get("subject"), Some("ok"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_headers_parse_without_blank_line() {
        let headers = Headers::parse("Subject: tail");
        assert_eq!(headers.get("subject"), Some("tail"));
    }

    #[test]
    fn test_headers_iter() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");
        assert_eq!(headers.iter().count(), 2);
    }
}
