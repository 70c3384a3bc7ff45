//! Editor configuration and shared defaults.
//!
//! Every default the store, the gesture handlers and the view model fall back
//! to lives here so the three agree on the same numbers.

use serde::{Deserialize, Serialize};

use crate::element::Rect;

/// Default background color of an empty canvas.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#e9d5ff";

/// Text colors offered by the color picker. The first entry is the default.
pub const DEFAULT_PALETTE: [&str; 5] = ["#353535", "#fff", "#cf0000", "#0055FF", "#00da16"];

/// Canvas (and export) width in pixels.
pub const CANVAS_WIDTH: u32 = 1080;

/// Canvas (and export) height in pixels.
pub const CANVAS_HEIGHT: u32 = 1350;

/// Frame used for any geometry field an element has not set yet.
pub const DEFAULT_FRAME: Rect = Rect {
    x: 50.0,
    y: 50.0,
    width: 350.0,
    height: 120.0,
};

/// Width a resize is measured against when the element has no stored width.
pub const RESIZE_FALLBACK_WIDTH: f32 = 200.0;

/// Font size a text element scales from when it has no stored font size.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Placeholder shown by empty text elements.
pub const TEXT_PLACEHOLDER: &str = "Lorem Ipsum";

/// File name offered for the exported PNG.
pub const EXPORT_FILE_NAME: &str = "canvas.png";

/// Stable identifier of the canvas root in the rendered view.
pub const CANVAS_ROOT_ID: &str = "editor";

/// Runtime configuration for an editor session.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Colors offered to text elements; the first one is used for new text.
    pub palette: Vec<String>,
    /// Background color restored by a reset.
    pub background_color: String,
    /// Drawable canvas width in pixels.
    pub canvas_width: u32,
    /// Drawable canvas height in pixels.
    pub canvas_height: u32,
    /// Frame applied to unset geometry fields.
    pub default_frame: Rect,
    /// File name used for exported PNGs.
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            default_frame: DEFAULT_FRAME,
            export_file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Color assigned to newly added text elements.
    #[must_use]
    pub fn default_text_color(&self) -> &str {
        self.palette
            .first()
            .map_or(DEFAULT_PALETTE[0], String::as_str)
    }

    /// Parse a config from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> crate::EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Canvas size as floating point `(width, height)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width as f32, self.canvas_height as f32)
    }
}
