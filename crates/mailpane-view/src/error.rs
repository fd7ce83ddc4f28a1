//! Error types for the display pipeline.

/// Result type alias for display operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Display pipeline error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structural failure while parsing the message.
    #[error(transparent)]
    Mime(#[from] mailpane_mime::Error),

    /// Neither an HTML nor a plain-text leaf exists anywhere in the tree.
    #[error("No renderable body found in message")]
    NoRenderableBody,
}
