//! File uploads: image selection, data URL encoding and upload tickets.
//!
//! Reading a file is asynchronous and happens in the host. The editor hands
//! out an [`UploadTicket`] when a file is picked; the host reads the bytes,
//! encodes them with [`encode_data_url`] and completes the ticket. Tickets
//! remember the editor scope they were issued in, so a completion that
//! arrives after the editor was torn down is dropped.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

/// MIME filter applied to the file pickers.
pub const ACCEPT_IMAGES: &str = "image/*";

/// A file chosen in a file picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelection {
    /// File name or path as reported by the picker.
    pub name: String,
    /// MIME type reported by the picker, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileSelection {
    /// Create a selection without a reported MIME type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: None,
        }
    }

    /// Set the reported MIME type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

fn extension(name: &str) -> &str {
    name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Image formats recognized when a picker does not report a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// GIF image.
    Gif,
    /// WebP image.
    WebP,
    /// SVG vector image.
    Svg,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            "svg" => Self::Svg,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }
        Self::Unknown
    }

    /// MIME type of the format.
    #[must_use]
    pub fn mime(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::WebP => Some("image/webp"),
            Self::Svg => Some("image/svg+xml"),
            Self::Unknown => None,
        }
    }
}

/// Encode file content as a base64 data URL.
///
/// The MIME type comes from the selection, then the content, then the file
/// extension.
///
/// # Errors
///
/// Returns [`EditorError::EmptyFile`] for empty content and
/// [`EditorError::UnsupportedMedia`] if the file is not an image.
pub fn encode_data_url(file: &FileSelection, bytes: &[u8]) -> EditorResult<String> {
    if bytes.is_empty() {
        return Err(EditorError::EmptyFile(file.name.clone()));
    }
    let mime = match &file.mime {
        Some(mime) => mime.to_ascii_lowercase(),
        None => ImageFormat::from_magic_bytes(bytes)
            .mime()
            .or_else(|| ImageFormat::from_extension(extension(&file.name)).mime())
            .ok_or_else(|| EditorError::UnsupportedMedia(file.name.clone()))?
            .to_string(),
    };
    if !mime.starts_with("image/") {
        return Err(EditorError::UnsupportedMedia(mime));
    }
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type from the URL header (may be empty).
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Parse a `data:` URL in base64 or percent-encoded form.
///
/// # Errors
///
/// Returns [`EditorError::InvalidDataUrl`] if the URL is malformed.
pub fn parse_data_url(url: &str) -> EditorResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| EditorError::InvalidDataUrl("not a data URL".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| EditorError::InvalidDataUrl("missing comma".to_string()))?;

    let is_base64 = metadata.ends_with(";base64");
    let mime = metadata
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string();

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| EditorError::InvalidDataUrl(format!("bad base64: {e}")))?
    } else {
        percent_decode(payload)?
    };
    Ok(DataUrl { mime, bytes })
}

fn percent_decode(input: &str) -> EditorResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| EditorError::InvalidDataUrl("bad percent escape".to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// What a completed upload is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadTarget {
    /// Append a new image element.
    Element,
    /// Replace the canvas background image.
    Background,
}

/// A pending file read issued by the editor.
///
/// Completing a ticket consumes it, so each read is applied at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket {
    pub(crate) seq: u64,
    pub(crate) scope: u64,
    target: UploadTarget,
    file: FileSelection,
}

impl UploadTicket {
    pub(crate) fn new(seq: u64, scope: u64, target: UploadTarget, file: FileSelection) -> Self {
        Self {
            seq,
            scope,
            target,
            file,
        }
    }

    /// What the upload will be applied to.
    #[must_use]
    pub fn target(&self) -> UploadTarget {
        self.target
    }

    /// The file to read.
    #[must_use]
    pub fn file(&self) -> &FileSelection {
        &self.file
    }

    /// Sequence number of the ticket within its editor.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}
