//! Structured address field values.
//!
//! An address header is legally a mailbox, a bare display string, or a
//! group containing further addresses. The variants are resolved once at
//! parse time instead of being re-sniffed at every display site.

use std::fmt;

/// One decoded value of an address-class header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// A display string that is not a recognizable mailbox.
    Text(String),
    /// A single mailbox, optionally with a display name.
    Mailbox {
        /// Display name, if one preceded the angle-addr.
        name: Option<String>,
        /// The mailbox itself (`local@domain`).
        address: String,
    },
    /// An ordered list of addresses (a group or a multi-mailbox field).
    List(Vec<Address>),
}

impl Address {
    /// Flattens this address into its mailbox count.
    #[must_use]
    pub fn mailbox_count(&self) -> usize {
        match self {
            Self::Text(_) => 0,
            Self::Mailbox { .. } => 1,
            Self::List(items) => items.iter().map(Self::mailbox_count).sum(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Mailbox {
                name: Some(name),
                address,
            } => write!(f, "{name} <{address}>"),
            Self::Mailbox {
                name: None,
                address,
            } => write!(f, "{address}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parses a decoded address field into a single `Address`.
///
/// Returns `None` for an empty field, the sole entry for a single-item
/// field, and `Address::List` when the field holds several entries.
/// Parsing is best-effort: anything unrecognizable is kept as
/// `Address::Text`.
#[must_use]
pub fn parse_address_field(value: &str) -> Option<Address> {
    let mut list = parse_address_list(value);
    match list.len() {
        0 => None,
        1 => list.pop(),
        _ => Some(Address::List(list)),
    }
}

/// Splits a decoded address field on top-level commas into an ordered
/// list, respecting quoted strings and `:`/`;` groups.
#[must_use]
pub fn parse_address_list(value: &str) -> Vec<Address> {
    let mut addresses = Vec::new();

    for token in split_top_level(value) {
        let token = token.trim();
        if !token.is_empty() {
            addresses.push(parse_single(token));
        }
    }

    addresses
}

/// Splits on commas outside quoted strings, angle brackets and groups.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut group_depth = 0usize;

    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1, // skip escaped char
            b'"' => in_quotes = !in_quotes,
            b'<' if !in_quotes => in_angle = true,
            b'>' if !in_quotes => in_angle = false,
            b':' if !in_quotes && !in_angle => group_depth += 1,
            b';' if !in_quotes && !in_angle => group_depth = group_depth.saturating_sub(1),
            b',' if !in_quotes && !in_angle && group_depth == 0 => {
                tokens.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    tokens.push(&value[start..]);
    tokens
}

fn parse_single(token: &str) -> Address {
    // Group: "name: mailbox, mailbox;" — the group collapses to an
    // ordered list of its members.
    if let Some(colon) = find_top_level_colon(token) {
        let members = token[colon + 1..].trim_end_matches(';');
        return Address::List(parse_address_list(members));
    }

    // Angle-addr with optional display name: `Name <local@domain>`
    if let Some(open) = token.rfind('<')
        && let Some(close) = token.rfind('>')
        && close > open
    {
        let address = token[open + 1..close].trim().to_string();
        let name = unquote(token[..open].trim());
        return Address::Mailbox {
            name: (!name.is_empty()).then_some(name),
            address,
        };
    }

    // Bare mailbox
    if token.contains('@') && !token.contains(char::is_whitespace) {
        return Address::Mailbox {
            name: None,
            address: token.to_string(),
        };
    }

    Address::Text(unquote(token))
}

/// Finds a `:` that introduces a group (outside quotes and angle-addrs).
fn find_top_level_colon(token: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut in_angle = false;
    let bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1,
            b'"' => in_quotes = !in_quotes,
            b'<' if !in_quotes => in_angle = true,
            b'>' if !in_quotes => in_angle = false,
            b':' if !in_quotes && !in_angle => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Strips one layer of surrounding double quotes and backslash escapes.
fn unquote(s: &str) -> String {
    let inner = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_mailbox() {
        assert_eq!(
            parse_address_field("a@example.com"),
            Some(Address::Mailbox {
                name: None,
                address: "a@example.com".to_string()
            })
        );
    }

    #[test]
    fn test_parse_named_mailbox() {
        assert_eq!(
            parse_address_field("Alice Archer <a@example.com>"),
            Some(Address::Mailbox {
                name: Some("Alice Archer".to_string()),
                address: "a@example.com".to_string()
            })
        );
    }

    #[test]
    fn test_parse_two_quoted_mailboxes() {
        let parsed = parse_address_field(r#""A" <a@example.com>, "B" <b@example.com>"#);
        let Some(Address::List(items)) = parsed else {
            panic!("expected list, got {parsed:?}");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            Address::Mailbox {
                name: Some("A".to_string()),
                address: "a@example.com".to_string()
            }
        );
        assert_eq!(
            items[1],
            Address::Mailbox {
                name: Some("B".to_string()),
                address: "b@example.com".to_string()
            }
        );
    }

    #[test]
    fn test_parse_quoted_comma_in_name() {
        assert_eq!(
            parse_address_field(r#""Doe, John" <j@example.com>"#),
            Some(Address::Mailbox {
                name: Some("Doe, John".to_string()),
                address: "j@example.com".to_string()
            })
        );
    }

    #[test]
    fn test_parse_group() {
        let parsed = parse_address_field("Team: a@example.com, b@example.com;").unwrap();
        assert_eq!(parsed.mailbox_count(), 2);
        let Address::List(items) = parsed else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_parse_group_beside_mailbox() {
        let parsed =
            parse_address_field("Team: a@example.com, b@example.com;, c@example.com").unwrap();
        assert_eq!(parsed.mailbox_count(), 3);
        let Address::List(items) = parsed else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Address::List(_)));
    }

    #[test]
    fn test_parse_unrecognizable_is_text() {
        assert_eq!(
            parse_address_field("undisclosed recipients"),
            Some(Address::Text("undisclosed recipients".to_string()))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_address_field(""), None);
        assert_eq!(parse_address_field("  , "), None);
    }

    #[test]
    fn test_display_round() {
        let addr = Address::List(vec![
            Address::Mailbox {
                name: Some("A".to_string()),
                address: "a@example.com".to_string(),
            },
            Address::Mailbox {
                name: None,
                address: "b@example.com".to_string(),
            },
        ]);
        assert_eq!(addr.to_string(), "A <a@example.com>, b@example.com");
    }
}
