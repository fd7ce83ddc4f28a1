//! Charset decoding for text bodies and encoded-words.
//!
//! Labels are resolved through `encoding_rs`; anything it does not know
//! (or bytes that do not decode cleanly) falls back to a lossy UTF-8
//! decode with replacement characters, so charset problems never fail a
//! parse.

use encoding_rs::Encoding;
use tracing::debug;

/// Decodes `bytes` using the given charset label.
///
/// Unknown labels and undecodable byte sequences degrade to lossy UTF-8
/// rather than erroring. Decoding is always total: every input produces
/// some string.
#[must_use]
pub fn decode(bytes: &[u8], charset: &str) -> String {
    Encoding::for_label(charset.trim().as_bytes()).map_or_else(
        || {
            debug!("unknown charset label {charset:?}, falling back to lossy utf-8");
            String::from_utf8_lossy(bytes).into_owned()
        },
        |encoding| {
            let (text, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                debug!("charset {charset:?} decoded with replacement characters");
            }
            text.into_owned()
        },
    )
}

/// Checks whether a charset label is known to the decoder.
#[must_use]
pub fn is_known(charset: &str) -> bool {
    Encoding::for_label(charset.trim().as_bytes()).is_some()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode("Héllo".as_bytes(), "utf-8"), "Héllo");
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode(&[0x48, 0xE9, 0x6C, 0x6C, 0x6F], "iso-8859-1"), "Héllo");
    }

    #[test]
    fn test_decode_unknown_charset_falls_back() {
        assert_eq!(decode(b"plain ascii", "x-no-such-charset"), "plain ascii");
    }

    #[test]
    fn test_decode_invalid_bytes_substitutes() {
        // 0xFF is never valid UTF-8
        let decoded = decode(&[b'a', 0xFF, b'b'], "utf-8");
        assert!(decoded.starts_with('a'));
        assert!(decoded.ends_with('b'));
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn test_is_known() {
        assert!(is_known("UTF-8"));
        assert!(is_known("iso-8859-1"));
        assert!(!is_known("x-no-such-charset"));
    }
}
