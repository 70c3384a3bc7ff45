//! Editor session: the store, the per-element controllers and the upload
//! scope, wired together the way the UI drives them.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{ElementId, ElementPatch};
use crate::error::EditorError;
use crate::interaction::{DragStop, ElementController, FocusTarget, ResizeReport};
use crate::panel::PanelAction;
use crate::store::ElementStore;
use crate::upload::{FileSelection, UploadTarget, UploadTicket};
use crate::view::{render_canvas, CanvasView};

/// Scopes are unique per process so a ticket never matches another editor.
static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

fn next_scope() -> u64 {
    NEXT_SCOPE.fetch_add(1, Ordering::Relaxed)
}

/// A UI event passed to handlers that may stop it from bubbling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiEvent {
    propagation_stopped: bool,
}

impl UiEvent {
    /// Create an event that has not been stopped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the event from reaching parent handlers.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether a handler stopped the event.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Result of completing an upload ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// A new image element was appended.
    ElementAdded {
        /// Id of the new element.
        id: ElementId,
    },
    /// The background image was replaced.
    BackgroundSet,
    /// The read failed; nothing changed.
    Failed,
    /// The ticket belongs to a torn-down scope; nothing changed.
    Stale,
}

/// What the host has to do after a panel action.
#[derive(Debug, PartialEq, Eq)]
pub enum PanelEffect {
    /// Nothing further to do.
    Done,
    /// A text element was added.
    TextAdded(ElementId),
    /// A file has to be read and the ticket completed.
    Upload(UploadTicket),
    /// The canvas has to be exported.
    Export,
}

/// A mounted canvas editor.
///
/// # Example
///
/// ```
/// use editor_core::{DragStop, Editor, EditorConfig, Visibility};
///
/// let mut editor = Editor::new(EditorConfig::default());
/// let id = editor.add_text();
/// editor.acknowledge_focus(id);
/// assert!(editor.drag_stop(id, DragStop { x: 10.0, y: 10.0 }));
/// assert_eq!(editor.visibility(id), Some(Visibility::Visible));
/// ```
#[derive(Debug)]
pub struct Editor {
    store: ElementStore,
    controllers: HashMap<ElementId, ElementController>,
    scope: u64,
    next_ticket: u64,
    outstanding: HashSet<u64>,
    mounted: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create and mount an editor with an empty canvas.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: ElementStore::new(config),
            controllers: HashMap::new(),
            scope: next_scope(),
            next_ticket: 0,
            outstanding: HashSet::new(),
            mounted: true,
        }
    }

    /// The element store.
    #[must_use]
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Whether the editor is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear the editor down.
    ///
    /// State is discarded and every outstanding upload ticket becomes stale.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if !self.outstanding.is_empty() {
            tracing::debug!(
                "Unmounting with {} pending uploads; they will be dropped",
                self.outstanding.len()
            );
        }
        self.store = ElementStore::new(self.store.config().clone());
        self.controllers.clear();
        self.outstanding.clear();
        self.scope = next_scope();
        self.mounted = false;
    }

    /// Mount a torn-down editor again with an empty canvas.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Add a text element.
    pub fn add_text(&mut self) -> ElementId {
        let id = self.store.add_text();
        self.mount_controller(id);
        tracing::info!("Text element {id} added");
        id
    }

    fn mount_controller(&mut self, id: ElementId) {
        if let Some(element) = self.store.element(id) {
            self.controllers.insert(id, ElementController::mount(element));
        }
    }

    /// Start adding an image element from the picked file.
    ///
    /// Returns `None` (and does nothing) when no file was picked.
    pub fn add_image(&mut self, file: Option<FileSelection>) -> Option<UploadTicket> {
        self.begin_upload(UploadTarget::Element, file)
    }

    /// Start replacing the background image with the picked file.
    ///
    /// Returns `None` (and does nothing) when no file was picked.
    pub fn set_background(&mut self, file: Option<FileSelection>) -> Option<UploadTicket> {
        self.begin_upload(UploadTarget::Background, file)
    }

    fn begin_upload(
        &mut self,
        target: UploadTarget,
        file: Option<FileSelection>,
    ) -> Option<UploadTicket> {
        if !self.mounted {
            return None;
        }
        let file = file?;
        self.next_ticket += 1;
        let seq = self.next_ticket;
        self.outstanding.insert(seq);
        tracing::debug!("Upload {seq} of {} started for {target:?}", file.name);
        Some(UploadTicket::new(seq, self.scope, target, file))
    }

    /// Apply the result of a file read.
    ///
    /// `result` is the encoded data URL or the error the read produced.
    /// Completions apply in the order they arrive.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<String, EditorError>,
    ) -> UploadOutcome {
        if ticket.scope != self.scope || !self.outstanding.remove(&ticket.seq) {
            tracing::debug!("Dropping stale upload {}", ticket.seq);
            return UploadOutcome::Stale;
        }
        let source = match result {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Upload of {} failed: {e}", ticket.file().name);
                return UploadOutcome::Failed;
            }
        };
        match ticket.target() {
            UploadTarget::Element => {
                let id = self.store.add_image(source);
                self.mount_controller(id);
                tracing::info!("Image element {id} added from {}", ticket.file().name);
                UploadOutcome::ElementAdded { id }
            }
            UploadTarget::Background => {
                self.store.set_background_image(source);
                tracing::info!("Background set from {}", ticket.file().name);
                UploadOutcome::BackgroundSet
            }
        }
    }

    /// Number of uploads started and not yet completed.
    #[must_use]
    pub fn pending_uploads(&self) -> usize {
        self.outstanding.len()
    }

    /// Remove an element from its delete button.
    ///
    /// The click is stopped so the surrounding drag container never sees it.
    pub fn remove_element(&mut self, id: ElementId, event: &mut UiEvent) -> bool {
        event.stop_propagation();
        self.controllers.remove(&id);
        let removed = self.store.remove_element(id);
        if removed {
            tracing::info!("Element {id} removed");
        }
        removed
    }

    /// Merge a partial update into an element.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.store.update_element(id, patch)
    }

    /// Pick a color for a text element from its color picker.
    ///
    /// Colors outside the palette are rejected.
    pub fn pick_color(&mut self, id: ElementId, color: &str) -> bool {
        if !self.store.config().palette.iter().any(|c| c == color) {
            tracing::debug!("Color {color} is not in the palette");
            return false;
        }
        self.store.update_element(id, &ElementPatch::color(color))
    }

    /// Replace the text typed into a text element.
    pub fn type_text(&mut self, id: ElementId, text: &str) -> bool {
        self.store.update_element(id, &ElementPatch::content(text))
    }

    /// Replace the background color.
    pub fn set_background_color(&mut self, color: &str) {
        self.store.set_background_color(color);
    }

    /// Clear the canvas and restore the default background.
    pub fn reset(&mut self) {
        self.store.reset();
        self.controllers.clear();
        tracing::info!("Canvas reset");
    }

    /// Report a completed drag on an element.
    pub fn drag_stop(&mut self, id: ElementId, report: DragStop) -> bool {
        match self.controllers.get_mut(&id) {
            Some(controller) => controller.on_drag_stop(&mut self.store, report),
            None => false,
        }
    }

    /// Report a resize of an element.
    pub fn resize(&mut self, id: ElementId, report: ResizeReport) -> bool {
        match self.controllers.get(&id) {
            Some(controller) => controller.on_resize(&mut self.store, report),
            None => false,
        }
    }

    /// Report that an element lost focus.
    pub fn blur(&mut self, id: ElementId, target: FocusTarget) {
        if let Some(controller) = self.controllers.get_mut(&id) {
            controller.on_blur(target);
        }
    }

    /// Report that focus re-entered an element.
    pub fn focus(&mut self, id: ElementId) {
        if let Some(controller) = self.controllers.get_mut(&id) {
            controller.on_focus();
        }
    }

    /// Elements mounted since the host last focused them.
    #[must_use]
    pub fn pending_focus(&self) -> Vec<ElementId> {
        let mut ids: Vec<_> = self
            .controllers
            .values()
            .filter(|c| c.needs_focus())
            .map(ElementController::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Record that the host focused a freshly mounted element.
    pub fn acknowledge_focus(&mut self, id: ElementId) {
        if let Some(controller) = self.controllers.get_mut(&id) {
            controller.acknowledge_focus();
        }
    }

    /// Controller of a mounted element.
    #[must_use]
    pub fn controller(&self, id: ElementId) -> Option<&ElementController> {
        self.controllers.get(&id)
    }

    /// Control visibility of a mounted element.
    #[must_use]
    pub fn visibility(&self, id: ElementId) -> Option<crate::interaction::Visibility> {
        self.controllers.get(&id).map(ElementController::visibility)
    }

    /// Render the canvas. `None` while unmounted: there is no canvas root.
    #[must_use]
    pub fn view(&self) -> Option<CanvasView> {
        self.mounted
            .then(|| render_canvas(&self.store, &self.controllers))
    }

    /// Run a control panel action.
    pub fn dispatch(&mut self, action: PanelAction) -> PanelEffect {
        match action {
            PanelAction::AddText => PanelEffect::TextAdded(self.add_text()),
            PanelAction::AddImage { file } => {
                self.add_image(file).map_or(PanelEffect::Done, PanelEffect::Upload)
            }
            PanelAction::SetBackground { file } => self
                .set_background(file)
                .map_or(PanelEffect::Done, PanelEffect::Upload),
            PanelAction::Reset => {
                self.reset();
                PanelEffect::Done
            }
            PanelAction::Export => PanelEffect::Export,
        }
    }
}
