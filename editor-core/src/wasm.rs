//! WebAssembly bindings for editor-core.
//!
//! The browser host owns the DOM, the drag/resize widgets and the file
//! pickers. It forwards their events here and redraws from the JSON view.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::{
    encode_data_url, CanvasView, DragStop, Editor, EditorConfig, ElementId, FileSelection,
    FocusTarget, ResizeReport, UiEvent, UploadTicket,
};

/// Initialize the editor WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
    uploads: HashMap<u64, UploadTicket>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            editor: Editor::new(EditorConfig::default()),
            uploads: HashMap::new(),
        }
    }

    /// Current canvas view as JSON (`null` while unmounted).
    #[wasm_bindgen(js_name = getViewJson)]
    #[must_use]
    pub fn get_view_json(&self) -> String {
        serde_json::to_string(&self.editor.view()).unwrap_or_default()
    }

    /// Canvas view with editing chrome stripped, for PNG export (`null` while
    /// unmounted).
    #[wasm_bindgen(js_name = exportViewJson)]
    #[must_use]
    pub fn export_view_json(&self) -> String {
        let view = self.editor.view().as_ref().map(CanvasView::without_chrome);
        serde_json::to_string(&view).unwrap_or_default()
    }

    /// Add a text element; returns its id.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self) -> u64 {
        self.editor.add_text().get()
    }

    /// Start an image upload for the picked file; returns the ticket number,
    /// or `undefined` when nothing was picked.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, name: Option<String>, mime: Option<String>) -> Option<u64> {
        let ticket = self.editor.add_image(selection(name, mime))?;
        Some(self.park(ticket))
    }

    /// Start a background upload for the picked file.
    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&mut self, name: Option<String>, mime: Option<String>) -> Option<u64> {
        let ticket = self.editor.set_background(selection(name, mime))?;
        Some(self.park(ticket))
    }

    /// Complete an upload with the bytes the file reader produced.
    ///
    /// Returns the outcome as JSON.
    #[wasm_bindgen(js_name = completeUpload)]
    pub fn complete_upload(&mut self, ticket: u64, bytes: &[u8]) -> String {
        let Some(ticket) = self.uploads.remove(&ticket) else {
            return "null".to_string();
        };
        let encoded = encode_data_url(ticket.file(), bytes);
        let outcome = self.editor.complete_upload(ticket, encoded);
        serde_json::to_string(&outcome).unwrap_or_default()
    }

    /// Remove an element from its delete button.
    #[wasm_bindgen(js_name = removeElement)]
    pub fn remove_element(&mut self, id: u64) -> bool {
        let mut event = UiEvent::new();
        self.editor.remove_element(ElementId::from_raw(id), &mut event)
    }

    /// Pick a palette color for a text element.
    #[wasm_bindgen(js_name = pickColor)]
    pub fn pick_color(&mut self, id: u64, color: &str) -> bool {
        self.editor.pick_color(ElementId::from_raw(id), color)
    }

    /// Replace the text of a text element.
    #[wasm_bindgen(js_name = typeText)]
    pub fn type_text(&mut self, id: u64, text: &str) -> bool {
        self.editor.type_text(ElementId::from_raw(id), text)
    }

    /// Report a completed drag.
    #[wasm_bindgen(js_name = dragStop)]
    pub fn drag_stop(&mut self, id: u64, x: f32, y: f32) -> bool {
        self.editor.drag_stop(ElementId::from_raw(id), DragStop { x, y })
    }

    /// Report a resize.
    #[wasm_bindgen(js_name = resize)]
    pub fn resize(&mut self, id: u64, width: f32, height: f32, x: f32, y: f32) -> bool {
        let report = ResizeReport {
            width,
            height,
            x,
            y,
        };
        self.editor.resize(ElementId::from_raw(id), report)
    }

    /// Report a blur; `inside` is true when focus moved within the element.
    #[wasm_bindgen(js_name = blur)]
    pub fn blur(&mut self, id: u64, inside: bool) {
        let target = if inside {
            FocusTarget::Inside
        } else {
            FocusTarget::Outside
        };
        self.editor.blur(ElementId::from_raw(id), target);
    }

    /// Report that focus re-entered an element.
    #[wasm_bindgen(js_name = focus)]
    pub fn focus(&mut self, id: u64) {
        self.editor.focus(ElementId::from_raw(id));
    }

    /// Set the background color.
    #[wasm_bindgen(js_name = setBackgroundColor)]
    pub fn set_background_color(&mut self, color: &str) {
        self.editor.set_background_color(color);
    }

    /// Ids of elements the host still has to focus after mounting.
    #[wasm_bindgen(js_name = pendingFocus)]
    #[must_use]
    pub fn pending_focus(&self) -> Vec<u64> {
        self.editor.pending_focus().into_iter().map(ElementId::get).collect()
    }

    /// Record that the host focused an element after mounting.
    #[wasm_bindgen(js_name = acknowledgeFocus)]
    pub fn acknowledge_focus(&mut self, id: u64) {
        self.editor.acknowledge_focus(ElementId::from_raw(id));
    }

    /// Clear the canvas.
    #[wasm_bindgen(js_name = resetCanvas)]
    pub fn reset_canvas(&mut self) {
        self.editor.reset();
    }

    /// Tear the editor down; pending uploads are dropped.
    #[wasm_bindgen(js_name = unmount)]
    pub fn unmount(&mut self) {
        self.editor.unmount();
        self.uploads.clear();
    }
}

impl WasmEditor {
    fn park(&mut self, ticket: UploadTicket) -> u64 {
        let seq = ticket.seq();
        self.uploads.insert(seq, ticket);
        seq
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn selection(name: Option<String>, mime: Option<String>) -> Option<FileSelection> {
    let name = name?;
    let file = FileSelection::new(name);
    Some(match mime {
        Some(mime) => file.with_mime(mime),
        None => file,
    })
}
