//! Gesture handling and control visibility for canvas elements.
//!
//! The drag/resize layer reports a final box when a gesture completes. This
//! module turns those reports into [`ElementPatch`]es and tracks, per
//! element, whether the editing controls (move handle, delete button, resize
//! handle, color picker) are shown.
//!
//! ```text
//!            blur to outside            drag end (image)
//!  Visible ───────────────────▶ Hidden  ◀───────────────── Visible
//!     ▲                           │
//!     └──────── focus / show ─────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_FONT_SIZE, RESIZE_FALLBACK_WIDTH};
use crate::element::{CanvasElement, ElementId, ElementKind, ElementPatch, Rect};
use crate::store::ElementStore;

/// Final position reported when a drag completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragStop {
    /// X position of the element's top-left corner.
    pub x: f32,
    /// Y position of the element's top-left corner.
    pub y: f32,
}

/// Box reported by a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeReport {
    /// New width in pixels.
    pub width: f32,
    /// New height in pixels.
    pub height: f32,
    /// X position after the resize.
    pub x: f32,
    /// Y position after the resize.
    pub y: f32,
}

/// The drawable area gestures are confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
}

impl CanvasBounds {
    /// Create bounds of the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a rectangle so it lies inside the canvas.
    ///
    /// The size is limited to the canvas (and at least one pixel) before the
    /// position is pulled back inside.
    #[must_use]
    pub fn clamp(&self, rect: Rect) -> Rect {
        let width = rect.width.clamp(1.0, self.width.max(1.0));
        let height = rect.height.clamp(1.0, self.height.max(1.0));
        Rect {
            x: rect.x.clamp(0.0, (self.width - width).max(0.0)),
            y: rect.y.clamp(0.0, (self.height - height).max(0.0)),
            width,
            height,
        }
    }
}

/// Compute the patch for a completed drag.
///
/// `frame` is the element's currently rendered box; only its size is used,
/// to keep the moved element inside `bounds`.
#[must_use]
pub fn drag_patch(report: DragStop, frame: Rect, bounds: CanvasBounds) -> ElementPatch {
    let clamped = bounds.clamp(Rect {
        x: report.x,
        y: report.y,
        ..frame
    });
    ElementPatch::position(clamped.x, clamped.y)
}

/// Compute the patch for a resize report.
///
/// Text scales its font by `new_width / previous_width`; images never get a
/// font size.
#[must_use]
pub fn resize_patch(element: &CanvasElement, report: ResizeReport, bounds: CanvasBounds) -> ElementPatch {
    let rect = bounds.clamp(Rect {
        x: report.x,
        y: report.y,
        width: report.width,
        height: report.height,
    });
    let previous_width = element
        .geometry
        .width
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(RESIZE_FALLBACK_WIDTH);
    let scale_factor = rect.width / previous_width;

    let font_size = match &element.kind {
        ElementKind::Text { font_size, .. } => {
            Some(font_size.unwrap_or(DEFAULT_FONT_SIZE) * scale_factor)
        }
        ElementKind::Image { .. } => None,
    };

    ElementPatch {
        x: Some(rect.x),
        y: Some(rect.y),
        width: Some(rect.width),
        height: Some(rect.height),
        font_size,
        ..ElementPatch::default()
    }
}

/// Why the controls of an element were hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideReason {
    /// Focus moved outside the element.
    Blur,
    /// A drag completed on an element that hides its chrome after moving.
    DragEnd,
}

/// Visibility of an element's editing controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Visibility {
    /// Controls are shown.
    Visible,
    /// Controls are hidden.
    Hidden(HideReason),
}

/// Where focus went when an element lost it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// Another node inside the element's container (text input, swatch).
    Inside,
    /// Somewhere outside the container, or nowhere.
    Outside,
}

/// Per-kind control behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPolicy {
    /// Hide controls when focus leaves the element.
    pub hide_on_blur: bool,
    /// Hide controls once a drag completes.
    pub hide_on_drag_end: bool,
    /// Offer the color picker.
    pub color_picker: bool,
}

impl ControlPolicy {
    /// Policy for an element kind.
    ///
    /// Text keeps its controls after a move so it can be recolored again;
    /// images drop their chrome as soon as they are placed.
    #[must_use]
    pub fn for_kind(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Text { .. } => Self {
                hide_on_blur: true,
                hide_on_drag_end: false,
                color_picker: true,
            },
            ElementKind::Image { .. } => Self {
                hide_on_blur: true,
                hide_on_drag_end: true,
                color_picker: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusState {
    /// Mounted, waiting for the host to focus the container.
    Pending,
    Focused,
    Unfocused,
}

/// Interaction state of one mounted element.
#[derive(Debug, Clone)]
pub struct ElementController {
    id: ElementId,
    policy: ControlPolicy,
    visibility: Visibility,
    focus: FocusState,
}

impl ElementController {
    /// Mount a controller for `element`. Controls start visible and a focus
    /// request is pending until [`Self::acknowledge_focus`] is called.
    #[must_use]
    pub fn mount(element: &CanvasElement) -> Self {
        Self {
            id: element.id,
            policy: ControlPolicy::for_kind(&element.kind),
            visibility: Visibility::Visible,
            focus: FocusState::Pending,
        }
    }

    /// Id of the element this controller drives.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Current visibility state.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the host still has to focus the container after mounting.
    #[must_use]
    pub fn needs_focus(&self) -> bool {
        self.focus == FocusState::Pending
    }

    /// Record that the host focused the container after mounting.
    pub fn acknowledge_focus(&mut self) {
        if self.focus == FocusState::Pending {
            self.focus = FocusState::Focused;
            tracing::debug!("Element {} focused after mount", self.id);
        }
    }

    /// Focus re-entered the element; show its controls again.
    pub fn on_focus(&mut self) {
        self.focus = FocusState::Focused;
        self.show_controls();
    }

    /// Show the controls regardless of why they were hidden.
    pub fn show_controls(&mut self) {
        if self.visibility != Visibility::Visible {
            tracing::debug!("Showing controls of element {}", self.id);
        }
        self.visibility = Visibility::Visible;
    }

    /// Focus left the element.
    ///
    /// Ignored until the post-mount focus happened, and when focus only moved
    /// to another node inside the container.
    pub fn on_blur(&mut self, target: FocusTarget) {
        if self.focus != FocusState::Focused {
            return;
        }
        if target == FocusTarget::Inside {
            return;
        }
        self.focus = FocusState::Unfocused;
        if self.policy.hide_on_blur {
            tracing::debug!("Element {} blurred, hiding controls", self.id);
            self.visibility = Visibility::Hidden(HideReason::Blur);
        }
    }

    /// Apply a completed drag to the store.
    ///
    /// Returns `false` if the drag was ignored: the move handle is gone or the
    /// element no longer exists.
    pub fn on_drag_stop(&mut self, store: &mut ElementStore, report: DragStop) -> bool {
        if !self.move_handle_visible() {
            tracing::debug!("Drag on element {} without move handle ignored", self.id);
            return false;
        }
        let Some(element) = store.element(self.id) else {
            return false;
        };
        let config = store.config();
        let frame = element.geometry.resolve(&config.default_frame);
        let (width, height) = config.canvas_size();
        let patch = drag_patch(report, frame, CanvasBounds::new(width, height));

        if !store.update_element(self.id, &patch) {
            return false;
        }
        if self.policy.hide_on_drag_end && self.visibility == Visibility::Visible {
            tracing::debug!("Element {} moved, hiding controls", self.id);
            self.visibility = Visibility::Hidden(HideReason::DragEnd);
        }
        true
    }

    /// Apply a resize report to the store.
    ///
    /// Returns `false` if resizing is disabled because the controls are
    /// hidden, or the element no longer exists.
    pub fn on_resize(&self, store: &mut ElementStore, report: ResizeReport) -> bool {
        if !self.resizable() {
            tracing::debug!("Resize on element {} with hidden controls ignored", self.id);
            return false;
        }
        let Some(element) = store.element(self.id) else {
            return false;
        };
        let (width, height) = store.config().canvas_size();
        let patch = resize_patch(element, report, CanvasBounds::new(width, height));
        store.update_element(self.id, &patch)
    }

    /// Whether the editing controls are shown.
    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// The move handle survives a drag-end hide and only disappears on blur.
    #[must_use]
    pub fn move_handle_visible(&self) -> bool {
        self.visibility != Visibility::Hidden(HideReason::Blur)
    }

    /// Whether the resize handle is active.
    #[must_use]
    pub fn resizable(&self) -> bool {
        self.controls_visible()
    }

    /// Whether the delete button is shown.
    #[must_use]
    pub fn delete_button_visible(&self) -> bool {
        self.controls_visible()
    }

    /// Whether the color picker is shown.
    #[must_use]
    pub fn color_picker_visible(&self) -> bool {
        self.policy.color_picker && self.controls_visible()
    }
}
