//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
///
/// Store mutations never fail: unknown ids and empty file selections are
/// no-ops. These errors come from decoding uploads and parsing documents.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The selected file is not an image.
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// The selected file has no content.
    #[error("Empty file: {0}")]
    EmptyFile(String),

    /// A data URL could not be parsed.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Reading the selected file failed.
    #[error("Failed to read file: {0}")]
    Read(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
