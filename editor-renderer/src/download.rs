//! Export adapter and download sinks.
//!
//! [`ExportAdapter::export`] never returns an error: a missing canvas is a
//! silent no-op and failures are logged and reported as
//! [`ExportOutcome::Failed`].

use std::path::PathBuf;

use editor_core::{parse_data_url, CanvasView, EditorConfig};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::export::{CanvasExporter, ExportConfig};

/// A file handed to a [`DownloadSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name.
    pub file_name: String,
    /// File content as a data URL.
    pub data_url: String,
}

impl Download {
    /// Decode the data URL back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data URL is malformed.
    pub fn bytes(&self) -> RenderResult<Vec<u8>> {
        parse_data_url(&self.data_url)
            .map(|data| data.bytes)
            .map_err(|e| RenderError::Export(e.to_string()))
    }
}

/// Somewhere an exported file can be delivered.
pub trait DownloadSink {
    /// Deliver a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stored.
    fn deliver(&mut self, download: Download) -> RenderResult<()>;
}

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectoryDownload {
    /// Sink writing into `dir`, which is created on first delivery.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DownloadSink for DirectoryDownload {
    fn deliver(&mut self, download: Download) -> RenderResult<()> {
        let bytes = download.bytes()?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&download.file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Keeps downloads in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDownload {
    /// Delivered files, oldest first.
    pub downloads: Vec<Download>,
}

impl DownloadSink for MemoryDownload {
    fn deliver(&mut self, download: Download) -> RenderResult<()> {
        self.downloads.push(download);
        Ok(())
    }
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// The PNG was delivered.
    Delivered {
        /// File name given to the sink.
        file_name: String,
        /// Size of the PNG in bytes.
        bytes: usize,
    },
    /// There was no canvas to export.
    NoTarget,
    /// Rendering or delivery failed; already logged.
    Failed {
        /// Error message.
        reason: String,
    },
}

/// Turns the rendered canvas into a downloaded PNG.
#[derive(Debug, Clone)]
pub struct ExportAdapter {
    exporter: CanvasExporter,
    file_name: String,
}

impl ExportAdapter {
    /// Adapter exporting at the configured canvas size under the configured
    /// file name.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_exporter(
            CanvasExporter::new(ExportConfig::from_editor(config)),
            config.export_file_name.clone(),
        )
    }

    /// Adapter using a custom exporter.
    #[must_use]
    pub fn with_exporter(exporter: CanvasExporter, file_name: impl Into<String>) -> Self {
        Self {
            exporter,
            file_name: file_name.into(),
        }
    }

    /// Export the canvas and hand the PNG to `sink`.
    ///
    /// `view` is `None` when the canvas is not mounted. Editing chrome is
    /// stripped before drawing.
    pub fn export(&self, view: Option<&CanvasView>, sink: &mut dyn DownloadSink) -> ExportOutcome {
        let Some(view) = view else {
            tracing::debug!("Export requested without a mounted canvas");
            return ExportOutcome::NoTarget;
        };

        match self.try_export(view, sink) {
            Ok(bytes) => ExportOutcome::Delivered {
                file_name: self.file_name.clone(),
                bytes,
            },
            Err(e) => {
                tracing::error!("Canvas export failed: {e}");
                ExportOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_export(&self, view: &CanvasView, sink: &mut dyn DownloadSink) -> RenderResult<usize> {
        let png = self.exporter.render_to_png(&view.without_chrome())?;
        let bytes = png.len();
        sink.deliver(Download {
            file_name: self.file_name.clone(),
            data_url: crate::export::png_data_url(&png),
        })?;
        tracing::info!(bytes, file_name = %self.file_name, "Exported canvas");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use editor_core::{render_canvas, ElementStore};

    use super::*;

    fn small_config() -> EditorConfig {
        EditorConfig {
            canvas_width: 40,
            canvas_height: 50,
            ..EditorConfig::default()
        }
    }

    fn adapter() -> ExportAdapter {
        let config = small_config();
        let exporter = CanvasExporter::new(ExportConfig {
            load_system_fonts: false,
            ..ExportConfig::from_editor(&config)
        });
        ExportAdapter::with_exporter(exporter, config.export_file_name)
    }

    struct FailingSink;

    impl DownloadSink for FailingSink {
        fn deliver(&mut self, _download: Download) -> RenderResult<()> {
            Err(RenderError::Download(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_missing_canvas_is_noop() {
        let mut sink = MemoryDownload::default();
        assert_eq!(adapter().export(None, &mut sink), ExportOutcome::NoTarget);
        assert!(sink.downloads.is_empty());
    }

    #[test]
    fn test_delivers_png_named_canvas() {
        let store = ElementStore::new(small_config());
        let view = render_canvas(&store, &HashMap::new());
        let mut sink = MemoryDownload::default();

        let outcome = adapter().export(Some(&view), &mut sink);
        assert!(matches!(outcome, ExportOutcome::Delivered { ref file_name, .. } if file_name == "canvas.png"));
        assert_eq!(sink.downloads.len(), 1);
        assert!(sink.downloads[0].data_url.starts_with("data:image/png;base64,"));
        let bytes = sink.downloads[0].bytes().expect("bytes");
        assert_eq!(&bytes[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_broken_image_is_reported_not_raised() {
        let mut store = ElementStore::new(small_config());
        store.add_image("data:image/png;base64,AAAA");
        let view = render_canvas(&store, &HashMap::new());
        let mut sink = MemoryDownload::default();

        let outcome = adapter().export(Some(&view), &mut sink);
        assert!(matches!(outcome, ExportOutcome::Failed { .. }));
        assert!(sink.downloads.is_empty());
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let store = ElementStore::new(small_config());
        let view = render_canvas(&store, &HashMap::new());
        let outcome = adapter().export(Some(&view), &mut FailingSink);
        assert!(matches!(outcome, ExportOutcome::Failed { ref reason } if reason.contains("read-only")));
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DirectoryDownload::new(dir.path().join("out"));
        sink.deliver(Download {
            file_name: "canvas.png".to_string(),
            data_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        })
        .expect("deliver");

        let path = dir.path().join("out").join("canvas.png");
        assert_eq!(sink.written(), &[path.clone()]);
        let written = std::fs::read(path).expect("read");
        assert_eq!(written, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(ExportOutcome::NoTarget).expect("json");
        assert_eq!(json["outcome"], "no_target");
    }
}
