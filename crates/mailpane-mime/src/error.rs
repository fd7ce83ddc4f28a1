//! Error types for MIME parsing.
//!
//! Only structural problems surface as errors. Encoding problems (bad
//! base64, invalid charset bytes, malformed encoded-words) are always
//! resolved through lenient fallbacks and never fail a parse.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME structural error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Multipart nesting exceeded the configured depth cap.
    #[error("Multipart nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
