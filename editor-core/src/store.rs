//! Element store - the single owner of canvas state.
//!
//! [`ElementStore`] holds the ordered element sequence together with the
//! background settings. Every mutation is one synchronous step; unknown ids
//! are treated as no-ops rather than errors, since a gesture can race with a
//! removal of the same element.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{CanvasElement, ElementId, ElementKind, ElementPatch, IdGenerator};

/// The canvas background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Background color as hex.
    pub color: String,
    /// Background image data URL; drawn over the color when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Ordered canvas elements plus background state.
///
/// # Example
///
/// ```
/// use editor_core::{ElementPatch, ElementStore};
///
/// let mut store = ElementStore::default();
/// let id = store.add_text();
/// assert!(store.update_element(id, &ElementPatch::color("#cf0000")));
/// assert!(store.remove_element(id));
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Vec<CanvasElement>,
    background: Background,
    ids: IdGenerator,
    config: EditorConfig,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl ElementStore {
    /// Create an empty store with the default background from `config`.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            elements: Vec::new(),
            background: Background {
                color: config.background_color.clone(),
                image: None,
            },
            ids: IdGenerator::new(),
            config,
        }
    }

    /// The configuration this store was created with.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Append a text element using the first palette color.
    pub fn add_text(&mut self) -> ElementId {
        let kind = ElementKind::text(self.config.default_text_color());
        self.push(kind)
    }

    /// Append an image element showing `source`.
    pub fn add_image(&mut self, source: impl Into<String>) -> ElementId {
        self.push(ElementKind::image(source))
    }

    fn push(&mut self, kind: ElementKind) -> ElementId {
        let element = CanvasElement::new(self.ids.next_id(), kind);
        let id = element.id;
        tracing::debug!("Added {} element {id}", element.kind.name());
        self.elements.push(element);
        id
    }

    /// Remove the element with `id`.
    ///
    /// Returns `false` if no such element exists.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|el| el.id != id);
        let removed = self.elements.len() != before;
        if removed {
            tracing::debug!("Removed element {id}");
        }
        removed
    }

    /// Merge `patch` into the element with `id`, keeping its position in the
    /// sequence.
    ///
    /// Returns `false` if no such element exists.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.elements.iter_mut().find(|el| el.id == id) {
            Some(element) => {
                element.apply(patch);
                true
            }
            None => {
                tracing::debug!("Update for unknown element {id} ignored");
                false
            }
        }
    }

    /// Replace the background image.
    pub fn set_background_image(&mut self, source: impl Into<String>) {
        self.background.image = Some(source.into());
    }

    /// Replace the background color.
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.background.color = color.into();
    }

    /// Clear all elements and restore the default background.
    ///
    /// Ids keep counting up, so an id from before the reset never names a
    /// new element.
    pub fn reset(&mut self) {
        self.elements.clear();
        self.background = Background {
            color: self.config.background_color.clone(),
            image: None,
        };
        tracing::debug!("Canvas reset");
    }

    /// Get an element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// All elements in creation (and drawing) order.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Number of elements on the canvas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the canvas has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
