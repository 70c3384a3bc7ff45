//! Canvas elements - the text and image objects placed on the canvas.

use serde::{Deserialize, Serialize};

/// Unique identifier for an element.
///
/// Ids are issued by an [`IdGenerator`] owned by the store and never reused
/// within that store's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source scoped to a single store.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Create a generator whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// An editable single-line text label.
    Text {
        /// Text color as hex, one of the palette entries.
        color: String,
        /// Font size in pixels, set once the element has been resized.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f32>,
        /// Text typed into the element.
        #[serde(default)]
        content: String,
    },

    /// An uploaded image.
    Image {
        /// Image data URL.
        source: String,
    },
}

impl ElementKind {
    /// Create the content of a fresh text element.
    #[must_use]
    pub fn text(color: impl Into<String>) -> Self {
        Self::Text {
            color: color.into(),
            font_size: None,
            content: String::new(),
        }
    }

    /// Create the content of an image element.
    #[must_use]
    pub fn image(source: impl Into<String>) -> Self {
        Self::Image {
            source: source.into(),
        }
    }

    /// Short lowercase name of the kind, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }
}

/// A fully resolved rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Position and size of an element. Unset fields fall back to the
/// configured default frame when rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// X position (pixels from left).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Y position (pixels from top).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl Geometry {
    /// Resolve unset fields against a default frame.
    #[must_use]
    pub fn resolve(&self, defaults: &Rect) -> Rect {
        Rect {
            x: self.x.unwrap_or(defaults.x),
            y: self.y.unwrap_or(defaults.y),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
        }
    }
}

/// A canvas element with content and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content. The variant never changes after creation.
    pub kind: ElementKind,
    /// Position and size.
    #[serde(default)]
    pub geometry: Geometry,
    /// Creation scale, always `1.0`.
    pub scale: f32,
}

impl CanvasElement {
    /// Create a new element with the given id and kind.
    #[must_use]
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            geometry: Geometry::default(),
            scale: 1.0,
        }
    }

    /// Text color, for text elements.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { color, .. } => Some(color),
            ElementKind::Image { .. } => None,
        }
    }

    /// Font size, for text elements that have one.
    #[must_use]
    pub fn font_size(&self) -> Option<f32> {
        match &self.kind {
            ElementKind::Text { font_size, .. } => *font_size,
            ElementKind::Image { .. } => None,
        }
    }

    /// Image data URL, for image elements.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { source } => Some(source),
            ElementKind::Text { .. } => None,
        }
    }

    /// Merge a patch into this element.
    ///
    /// Fields that have no meaning for the element's kind are ignored.
    pub fn apply(&mut self, patch: &ElementPatch) {
        let g = &mut self.geometry;
        if let Some(x) = patch.x {
            g.x = Some(x);
        }
        if let Some(y) = patch.y {
            g.y = Some(y);
        }
        if let Some(width) = patch.width.and_then(min_size) {
            g.width = Some(width);
        }
        if let Some(height) = patch.height.and_then(min_size) {
            g.height = Some(height);
        }

        if let ElementKind::Text {
            color,
            font_size,
            content,
        } = &mut self.kind
        {
            if let Some(new_color) = &patch.color {
                color.clone_from(new_color);
            }
            if let Some(size) = patch.font_size {
                *font_size = Some(size);
            }
            if let Some(text) = &patch.content {
                content.clone_from(text);
            }
        }
    }
}

/// Sizes are at least one pixel. Zero, negative and non-finite sizes are
/// ignored so the stored size keeps falling back to its default.
fn min_size(size: f32) -> Option<f32> {
    (size.is_finite() && size > 0.0).then(|| size.max(1.0))
}

/// A partial update to an element. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New X position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// New Y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// New text color (text only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New font size (text only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// New text content (text only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that recolors a text element.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Patch that replaces the text of a text element.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Check whether the patch carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
