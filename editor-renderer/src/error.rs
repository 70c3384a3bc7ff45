//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while exporting the canvas.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An image on the canvas could not be loaded.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Export (SVG parsing, rasterization or encoding) failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Delivering the exported file failed.
    #[error("Download failed: {0}")]
    Download(#[from] std::io::Error),
}
