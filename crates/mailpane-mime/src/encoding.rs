//! Transfer encoding and RFC 2047 header decoding.
//!
//! Decoders here are deliberately lenient: real-world messages contain
//! stray characters in base64 streams, bad quoted-printable escapes and
//! half-formed encoded-words, and the right answer for a viewer is to
//! recover what can be recovered. The encoders are strict reference
//! implementations used by the round-trip tests and by hosts that need
//! to re-emit content.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

use crate::charset;

/// Base64 engine that accepts both padded and unpadded input and
/// tolerates non-canonical trailing bits.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data leniently.
///
/// Characters outside the base64 alphabet (line breaks, whitespace,
/// padding, stray bytes) are skipped rather than rejected. A trailing
/// symbol that carries fewer than 8 bits is dropped.
#[must_use]
pub fn decode_base64(data: &str) -> Vec<u8> {
    let mut filtered: Vec<u8> = data
        .bytes()
        .filter(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/'))
        .collect();

    // A single leftover symbol cannot form a full output byte.
    if filtered.len() % 4 == 1 {
        filtered.pop();
    }

    LENIENT_BASE64.decode(&filtered).unwrap_or_default()
}

/// Maximum line length for Quoted-Printable encoding.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes bytes using Quoted-Printable encoding (RFC 2045).
///
/// Encodes everything that is not printable ASCII, inserting soft line
/// breaks to stay within the 76-column transport limit.
#[must_use]
pub fn encode_quoted_printable(data: &[u8]) -> String {
    let mut result = String::new();
    let mut line_length = 0;

    for byte in data {
        // Check if we need soft line break
        if line_length >= MAX_LINE_LENGTH - 3 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        match byte {
            // Printable ASCII except '=' and space (handle separately)
            b'!'..=b'<' | b'>'..=b'~' => {
                result.push(*byte as char);
                line_length += 1;
            }
            // Space needs special handling (encode at line end)
            b' ' => {
                if line_length >= MAX_LINE_LENGTH - 1 {
                    result.push_str("=20");
                    line_length += 3;
                } else {
                    result.push(' ');
                    line_length += 1;
                }
            }
            // Everything else gets encoded
            _ => {
                result.push('=');
                let _ = write!(result, "{byte:02X}");
                line_length += 3;
            }
        }
    }

    result
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Decodes Quoted-Printable bytes leniently (RFC 2045).
///
/// Soft line breaks (`=` at end of line) are elided, `=XX` hex escapes
/// become their byte value, and invalid escapes pass through literally.
#[must_use]
pub fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        // Soft line break
        if input.get(i + 1) == Some(&b'\r') && input.get(i + 2) == Some(&b'\n') {
            i += 3;
            continue;
        }
        if input.get(i + 1) == Some(&b'\n') {
            i += 2;
            continue;
        }
        // '=' truncated at end of input: a cut-off soft break
        if i + 1 >= input.len() {
            break;
        }

        // Hex encoded byte
        let high = input.get(i + 1).copied().and_then(hex_value);
        let low = input.get(i + 2).copied().and_then(hex_value);
        if let (Some(high), Some(low)) = (high, low) {
            result.push((high << 4) | low);
            i += 3;
        } else {
            // Invalid escape passes through literally
            result.push(byte);
            i += 1;
        }
    }

    result
}

/// Decodes RFC 2047 encoded-words anywhere in a header value.
///
/// Format: `=?charset?encoding?encoded-text?=` with `B` (base64) or `Q`
/// (quoted-printable with `_` for space) sub-encodings. Whitespace
/// between two adjacent encoded-words is folding artifact and is
/// dropped; an unparseable token is emitted literally. Decoding is
/// best-effort and never fails.
#[must_use]
pub fn decode_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    let mut last_was_encoded = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        if let Some((decoded, consumed)) = parse_encoded_word(candidate) {
            // Folded encoded-words must not introduce a spurious space
            let folding_gap =
                last_was_encoded && !before.is_empty() && before.chars().all(char::is_whitespace);
            if !folding_gap {
                out.push_str(before);
            }
            out.push_str(&decoded);
            last_was_encoded = true;
            rest = &candidate[consumed..];
        } else {
            out.push_str(before);
            out.push_str("=?");
            last_was_encoded = false;
            rest = &candidate[2..];
        }
    }

    out.push_str(rest);
    out
}

/// Parses one encoded-word at the start of `token` (which begins with
/// `=?`). Returns the decoded text and the number of bytes consumed,
/// or `None` if the token is not a well-formed encoded-word.
fn parse_encoded_word(token: &str) -> Option<(String, usize)> {
    let inner = token.strip_prefix("=?")?;
    let (charset, rest) = inner.split_once('?')?;
    let (encoding, rest) = rest.split_once('?')?;
    let (payload, after) = rest.split_once("?=")?;

    if charset.is_empty() || charset.chars().any(char::is_whitespace) {
        return None;
    }
    if payload.contains('\n') {
        return None;
    }

    // RFC 2231 language suffix on the charset ("utf-8*en") is ignored
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = match encoding {
        "B" | "b" => decode_base64(payload),
        "Q" | "q" => decode_quoted_printable(payload.replace('_', " ").as_bytes()),
        _ => return None,
    };

    let consumed = token.len() - after.len();
    Some((charset::decode(&bytes, charset), consumed))
}
