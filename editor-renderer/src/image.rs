//! Loading of the images placed on the canvas.
//!
//! resvg skips images it cannot decode and renders an empty box instead.
//! Export checks every image up front so a broken upload fails the export
//! rather than silently disappearing from it.

use editor_core::parse_data_url;

use crate::error::{RenderError, RenderResult};

/// Decoded size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Decode a data URL image and report its size.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the image cannot be decoded.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<ImageInfo> {
    let data = parse_data_url(uri).map_err(|e| RenderError::Resource(e.to_string()))?;

    if data.mime == "image/svg+xml" {
        let tree = usvg::Tree::from_data(&data.bytes, &usvg::Options::default())
            .map_err(|e| RenderError::Resource(format!("Failed to parse SVG: {e}")))?;
        return Ok(ImageInfo {
            width: tree.size().width().ceil() as u32,
            height: tree.size().height().ceil() as u32,
        });
    }

    load_image_from_bytes(&data.bytes)
}

/// Decode raw image bytes and report the size.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(bytes: &[u8]) -> RenderResult<ImageInfo> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;
    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
    })
}
