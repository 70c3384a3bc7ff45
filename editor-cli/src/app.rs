//! Script runner.
//!
//! Plays the role of the browser host: forwards button presses and gestures
//! to the editor, reads picked files in the background and focuses freshly
//! mounted elements. File reads run on a `JoinSet` and complete in whatever
//! order they finish.

use std::path::{Path, PathBuf};

use editor_core::{
    encode_data_url, DragStop, Editor, EditorConfig, EditorError, EditorResult, ElementId,
    FileSelection, FocusTarget, PanelAction, PanelEffect, ResizeReport, UiEvent, UploadOutcome,
    UploadTicket,
};
use editor_renderer::{DirectoryDownload, ExportAdapter, ExportOutcome};
use serde::Serialize;
use tokio::task::JoinSet;

use crate::script::ScriptStep;
use crate::CliConfig;

/// Summary of a script run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Steps executed.
    pub steps: usize,
    /// Upload outcomes in completion order.
    pub uploads: Vec<UploadOutcome>,
    /// Export outcomes in request order.
    pub exports: Vec<ExportOutcome>,
    /// Files written.
    pub written: Vec<PathBuf>,
}

type ReadResult = (UploadTicket, EditorResult<String>);

/// Plays scripts against an editor session.
pub struct ScriptRunner {
    editor: Editor,
    adapter: ExportAdapter,
    sink: DirectoryDownload,
    base_dir: PathBuf,
    reads: JoinSet<ReadResult>,
    report: RunReport,
}

impl ScriptRunner {
    /// Runner for a resolved CLI configuration. Upload paths are resolved
    /// against the script's directory.
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        let base_dir = config
            .script
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self::with_editor(&config.editor, &config.out_dir, base_dir)
    }

    /// Runner with an explicit editor config, output directory and upload
    /// base directory.
    #[must_use]
    pub fn with_editor(
        config: &EditorConfig,
        out_dir: impl Into<PathBuf>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            editor: Editor::new(config.clone()),
            adapter: ExportAdapter::new(config),
            sink: DirectoryDownload::new(out_dir),
            base_dir: base_dir.into(),
            reads: JoinSet::new(),
            report: RunReport::default(),
        }
    }

    /// Replace the export adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: ExportAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// The editor session.
    #[must_use]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Run every step, then wait for outstanding file reads.
    pub async fn run(&mut self, steps: Vec<ScriptStep>) -> RunReport {
        for step in steps {
            tracing::debug!(?step, "Running step");
            self.step(step).await;
            self.focus_new_elements();
        }
        self.settle().await;
        self.report.written = self.sink.written().to_vec();
        std::mem::take(&mut self.report)
    }

    async fn step(&mut self, step: ScriptStep) {
        self.report.steps += 1;
        match step {
            ScriptStep::AddText => {
                self.editor.dispatch(PanelAction::AddText);
            }
            ScriptStep::AddImage { path, mime } => {
                let file = path.as_deref().map(|p| selection(p, mime));
                let effect = self.editor.dispatch(PanelAction::AddImage { file });
                self.start_read(effect, path);
            }
            ScriptStep::SetBackground { path, mime } => {
                let file = path.as_deref().map(|p| selection(p, mime));
                let effect = self.editor.dispatch(PanelAction::SetBackground { file });
                self.start_read(effect, path);
            }
            ScriptStep::SetBackgroundColor { color } => self.editor.set_background_color(&color),
            ScriptStep::Reset => {
                self.editor.dispatch(PanelAction::Reset);
            }
            ScriptStep::Export => {
                if self.editor.dispatch(PanelAction::Export) == PanelEffect::Export {
                    let view = self.editor.view();
                    let outcome = self.adapter.export(view.as_ref(), &mut self.sink);
                    self.report.exports.push(outcome);
                }
            }
            ScriptStep::Settle => self.settle().await,
            ScriptStep::Drag { element, x, y } => {
                if let Some(id) = self.resolve(element) {
                    self.editor.drag_stop(id, DragStop { x, y });
                }
            }
            ScriptStep::Resize {
                element,
                width,
                height,
                x,
                y,
            } => {
                if let Some(id) = self.resolve(element) {
                    let report = ResizeReport {
                        width,
                        height,
                        x,
                        y,
                    };
                    self.editor.resize(id, report);
                }
            }
            ScriptStep::Blur { element, inside } => {
                if let Some(id) = self.resolve(element) {
                    let target = if inside {
                        FocusTarget::Inside
                    } else {
                        FocusTarget::Outside
                    };
                    self.editor.blur(id, target);
                }
            }
            ScriptStep::Focus { element } => {
                if let Some(id) = self.resolve(element) {
                    self.editor.focus(id);
                }
            }
            ScriptStep::Remove { element } => {
                if let Some(id) = self.resolve(element) {
                    let mut event = UiEvent::new();
                    self.editor.remove_element(id, &mut event);
                }
            }
            ScriptStep::Type { element, text } => {
                if let Some(id) = self.resolve(element) {
                    self.editor.type_text(id, &text);
                }
            }
            ScriptStep::Color { element, color } => {
                if let Some(id) = self.resolve(element) {
                    self.editor.pick_color(id, &color);
                }
            }
            ScriptStep::Unmount => self.editor.unmount(),
            ScriptStep::Mount => self.editor.mount(),
        }
    }

    fn resolve(&self, index: usize) -> Option<ElementId> {
        let id = self.editor.store().elements().get(index).map(|el| el.id);
        if id.is_none() {
            tracing::warn!("No element at index {index}; step skipped");
        }
        id
    }

    fn start_read(&mut self, effect: PanelEffect, path: Option<PathBuf>) {
        let (PanelEffect::Upload(ticket), Some(path)) = (effect, path) else {
            return;
        };
        let path = self.base_dir.join(path);
        self.reads.spawn(async move {
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => encode_data_url(ticket.file(), &bytes),
                Err(e) => Err(EditorError::Read(format!("{}: {e}", path.display()))),
            };
            (ticket, result)
        });
    }

    async fn settle(&mut self) {
        while let Some(joined) = self.reads.join_next().await {
            match joined {
                Ok((ticket, result)) => {
                    let outcome = self.editor.complete_upload(ticket, result);
                    self.report.uploads.push(outcome);
                    self.focus_new_elements();
                }
                Err(e) => tracing::error!("File read task failed: {e}"),
            }
        }
    }

    fn focus_new_elements(&mut self) {
        for id in self.editor.pending_focus() {
            self.editor.acknowledge_focus(id);
        }
    }
}

fn selection(path: &Path, mime: Option<String>) -> FileSelection {
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());
    let file = FileSelection::new(name.into_owned());
    match mime {
        Some(mime) => file.with_mime(mime),
        None => file,
    }
}

#[cfg(test)]
mod tests {
    use editor_core::{HideReason, Visibility};
    use editor_renderer::{CanvasExporter, ExportConfig};

    use super::*;

    fn write_png(dir: &Path, name: &str) {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 218, 22, 255]));
        img.save(dir.join(name)).expect("save png");
    }

    fn runner(dir: &Path) -> ScriptRunner {
        let config = EditorConfig {
            canvas_width: 60,
            canvas_height: 75,
            ..EditorConfig::default()
        };
        let adapter = ExportAdapter::with_exporter(
            CanvasExporter::new(ExportConfig {
                load_system_fonts: false,
                ..ExportConfig::from_editor(&config)
            }),
            "canvas.png",
        );
        ScriptRunner::with_editor(&config, dir.join("out"), dir).with_adapter(adapter)
    }

    #[tokio::test]
    async fn test_export_writes_canvas_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut runner = runner(dir.path());
        let report = runner
            .run(vec![ScriptStep::AddText, ScriptStep::Export])
            .await;

        assert_eq!(report.steps, 2);
        assert!(matches!(report.exports[..], [ExportOutcome::Delivered { .. }]));
        let path = dir.path().join("out").join("canvas.png");
        assert_eq!(report.written, vec![path.clone()]);
        let png = image::open(path).expect("png");
        assert_eq!((png.width(), png.height()), (60, 75));
    }

    #[tokio::test]
    async fn test_uploads_complete_after_settle() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "a.png");
        write_png(dir.path(), "b.png");
        let mut runner = runner(dir.path());

        let report = runner
            .run(vec![
                ScriptStep::AddImage {
                    path: Some("a.png".into()),
                    mime: None,
                },
                ScriptStep::SetBackground {
                    path: Some("b.png".into()),
                    mime: None,
                },
                ScriptStep::Settle,
            ])
            .await;

        assert_eq!(report.uploads.len(), 2);
        assert!(report.uploads.contains(&UploadOutcome::BackgroundSet));
        assert_eq!(runner.editor().store().len(), 1);
        assert!(runner.editor().store().background().image.is_some());
    }

    #[tokio::test]
    async fn test_missing_file_is_failed_upload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut runner = runner(dir.path());
        let report = runner
            .run(vec![ScriptStep::AddImage {
                path: Some("missing.png".into()),
                mime: None,
            }])
            .await;
        assert_eq!(report.uploads, vec![UploadOutcome::Failed]);
        assert!(runner.editor().store().is_empty());
    }

    #[tokio::test]
    async fn test_unmount_drops_pending_reads() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "a.png");
        let mut runner = runner(dir.path());
        let report = runner
            .run(vec![
                ScriptStep::AddImage {
                    path: Some("a.png".into()),
                    mime: None,
                },
                ScriptStep::Unmount,
                ScriptStep::Mount,
                ScriptStep::Settle,
                ScriptStep::Export,
            ])
            .await;
        assert_eq!(report.uploads, vec![UploadOutcome::Stale]);
        assert!(runner.editor().store().is_empty());
    }

    #[tokio::test]
    async fn test_export_while_unmounted_has_no_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut runner = runner(dir.path());
        let report = runner
            .run(vec![ScriptStep::Unmount, ScriptStep::Export])
            .await;
        assert_eq!(report.exports, vec![ExportOutcome::NoTarget]);
        assert!(report.written.is_empty());
    }

    #[tokio::test]
    async fn test_dismissed_picker_starts_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut runner = runner(dir.path());
        let report = runner
            .run(vec![ScriptStep::AddImage {
                path: None,
                mime: None,
            }])
            .await;
        assert!(report.uploads.is_empty());
        assert_eq!(runner.editor().pending_uploads(), 0);
    }

    #[tokio::test]
    async fn test_new_elements_are_focused_so_blur_hides_controls() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut runner = runner(dir.path());
        runner
            .run(vec![
                ScriptStep::AddText,
                ScriptStep::Blur {
                    element: 0,
                    inside: false,
                },
            ])
            .await;
        let id = runner.editor().store().elements()[0].id;
        assert!(runner.editor().pending_focus().is_empty());
        assert_eq!(
            runner.editor().visibility(id),
            Some(Visibility::Hidden(HideReason::Blur))
        );
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut runner = runner(dir.path());
        let report = runner
            .run(vec![
                ScriptStep::AddText,
                ScriptStep::Type {
                    element: 3,
                    text: "lost".to_string(),
                },
                ScriptStep::Color {
                    element: 0,
                    color: "#0055FF".to_string(),
                },
            ])
            .await;
        assert_eq!(report.steps, 3);
        let element = &runner.editor().store().elements()[0];
        assert_eq!(element.color(), Some("#0055FF"));
    }

    #[test]
    fn test_selection_uses_file_name() {
        let file = selection(Path::new("assets/cat.jpg"), Some("image/jpeg".to_string()));
        assert_eq!(file.name, "cat.jpg");
        assert_eq!(file.mime.as_deref(), Some("image/jpeg"));
    }
}
