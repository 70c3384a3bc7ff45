//! # Canvas Editor Renderer
//!
//! Exports the editor canvas as a PNG. The canvas view is drawn to SVG,
//! rasterized with resvg/tiny-skia and handed to a download sink as a
//! `data:image/png;base64,…` URL.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod error;
pub mod export;
pub mod image;

pub use download::{
    DirectoryDownload, Download, DownloadSink, ExportAdapter, ExportOutcome, MemoryDownload,
};
pub use error::{RenderError, RenderResult};
pub use export::{png_data_url, CanvasExporter, ExportConfig};
pub use image::{load_image_from_bytes, load_image_from_data_uri, ImageInfo};
