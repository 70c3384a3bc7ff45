//! Canvas view model.
//!
//! [`render_canvas`] is a pure function of the store and the element
//! controllers. Hosts draw the resulting [`CanvasView`]; the exporter draws
//! it without the editing chrome.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{CANVAS_ROOT_ID, DEFAULT_FONT_SIZE, TEXT_PLACEHOLDER};
use crate::element::{ElementId, ElementKind, Rect};
use crate::interaction::ElementController;
use crate::store::ElementStore;

/// How the canvas background is painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundView {
    /// Solid color.
    Color {
        /// Color as hex.
        color: String,
    },
    /// Image covering the canvas, centered.
    Image {
        /// Image data URL.
        source: String,
        /// Color shown where the image is transparent.
        color: String,
    },
}

/// Content drawn inside an element's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentView {
    /// Centered single-line text.
    Text {
        /// Typed text; empty shows the placeholder.
        content: String,
        /// Placeholder text.
        placeholder: String,
        /// Text color.
        color: String,
        /// Font size in pixels.
        font_size: f32,
    },
    /// Image cropped to cover the box.
    Image {
        /// Image data URL.
        source: String,
    },
}

/// A palette entry in the color picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    /// Swatch color.
    pub color: String,
    /// Whether this is the element's current color.
    pub selected: bool,
}

/// Editing affordances drawn around an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ChromeView {
    /// Highlight border around the element.
    pub bordered: bool,
    /// Move handle in the top-left corner.
    pub move_handle: bool,
    /// Delete button in the top-right corner.
    pub delete_button: bool,
    /// Resize handle in the bottom-right corner.
    pub resize_handle: bool,
    /// Color picker swatches, text only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_picker: Vec<Swatch>,
}

/// One element as drawn on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementView {
    /// Element id.
    pub id: ElementId,
    /// Box with defaults applied.
    pub rect: Rect,
    /// What is drawn inside the box.
    pub content: ContentView,
    /// Editing affordances.
    pub chrome: ChromeView,
}

/// The whole canvas as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasView {
    /// Stable identifier of the canvas root.
    pub root_id: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background paint.
    pub background: BackgroundView,
    /// Elements in drawing order.
    pub elements: Vec<ElementView>,
}

/// Build the view of the canvas.
///
/// Elements without a controller (not mounted yet) are drawn with their
/// controls visible, which is the state a freshly mounted controller starts
/// in.
#[must_use]
pub fn render_canvas(
    store: &ElementStore,
    controllers: &HashMap<ElementId, ElementController>,
) -> CanvasView {
    let config = store.config();
    let background = store.background();
    let background = match &background.image {
        Some(source) => BackgroundView::Image {
            source: source.clone(),
            color: background.color.clone(),
        },
        None => BackgroundView::Color {
            color: background.color.clone(),
        },
    };

    let elements = store
        .elements()
        .iter()
        .map(|element| {
            let controller = controllers.get(&element.id);
            let visible = controller.map_or(true, ElementController::controls_visible);
            let move_handle = controller.map_or(true, ElementController::move_handle_visible);

            let (content, color_picker) = match &element.kind {
                ElementKind::Text {
                    color,
                    font_size,
                    content,
                } => {
                    let picker = if visible {
                        config
                            .palette
                            .iter()
                            .map(|swatch| Swatch {
                                color: swatch.clone(),
                                selected: swatch == color,
                            })
                            .collect()
                    } else {
                        Vec::new()
                    };
                    let content = ContentView::Text {
                        content: content.clone(),
                        placeholder: TEXT_PLACEHOLDER.to_string(),
                        color: color.clone(),
                        font_size: font_size.unwrap_or(DEFAULT_FONT_SIZE),
                    };
                    (content, picker)
                }
                ElementKind::Image { source } => (
                    ContentView::Image {
                        source: source.clone(),
                    },
                    Vec::new(),
                ),
            };

            ElementView {
                id: element.id,
                rect: element.geometry.resolve(&config.default_frame),
                content,
                chrome: ChromeView {
                    bordered: visible,
                    move_handle,
                    delete_button: visible,
                    resize_handle: visible,
                    color_picker,
                },
            }
        })
        .collect();

    CanvasView {
        root_id: CANVAS_ROOT_ID.to_string(),
        width: config.canvas_width,
        height: config.canvas_height,
        background,
        elements,
    }
}

impl CanvasView {
    /// Find an element's view by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&ElementView> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Copy of the view with all editing chrome removed.
    #[must_use]
    pub fn without_chrome(&self) -> Self {
        let mut view = self.clone();
        for element in &mut view.elements {
            element.chrome = ChromeView::default();
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementPatch;
    use crate::interaction::FocusTarget;

    #[test]
    fn test_empty_canvas_uses_background_color() {
        let store = ElementStore::default();
        let view = render_canvas(&store, &HashMap::new());
        assert_eq!(view.root_id, "editor");
        assert_eq!((view.width, view.height), (1080, 1350));
        assert_eq!(
            view.background,
            BackgroundView::Color {
                color: "#e9d5ff".to_string()
            }
        );
        assert!(view.elements.is_empty());
    }

    #[test]
    fn test_background_image_wins_over_color() {
        let mut store = ElementStore::default();
        store.set_background_image("data:image/png;base64,AAAA");
        let view = render_canvas(&store, &HashMap::new());
        assert!(matches!(view.background, BackgroundView::Image { ref source, .. } if source == "data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_default_frame_and_font() {
        let mut store = ElementStore::default();
        let id = store.add_text();
        let view = render_canvas(&store, &HashMap::new());
        let element = view.element(id).expect("element");
        assert_eq!(
            element.rect,
            Rect {
                x: 50.0,
                y: 50.0,
                width: 350.0,
                height: 120.0
            }
        );
        assert!(matches!(
            &element.content,
            ContentView::Text { font_size, placeholder, .. }
                if (*font_size - 16.0).abs() < f32::EPSILON && placeholder == "Lorem Ipsum"
        ));
    }

    #[test]
    fn test_color_picker_marks_current_color() {
        let mut store = ElementStore::default();
        let id = store.add_text();
        store.update_element(id, &ElementPatch::color("#cf0000"));
        let view = render_canvas(&store, &HashMap::new());
        let picker = &view.element(id).expect("element").chrome.color_picker;
        assert_eq!(picker.len(), 5);
        let selected: Vec<_> = picker.iter().filter(|s| s.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].color, "#cf0000");
    }

    #[test]
    fn test_images_have_no_color_picker() {
        let mut store = ElementStore::default();
        let id = store.add_image("data:image/png;base64,AAAA");
        let view = render_canvas(&store, &HashMap::new());
        let chrome = &view.element(id).expect("element").chrome;
        assert!(chrome.color_picker.is_empty());
        assert!(chrome.delete_button);
    }

    #[test]
    fn test_blurred_element_has_no_chrome() {
        let mut store = ElementStore::default();
        let id = store.add_text();
        let mut controller = ElementController::mount(store.element(id).expect("element"));
        controller.acknowledge_focus();
        controller.on_blur(FocusTarget::Outside);

        let controllers = HashMap::from([(id, controller)]);
        let view = render_canvas(&store, &controllers);
        assert_eq!(view.element(id).expect("element").chrome, ChromeView::default());
    }

    #[test]
    fn test_view_preserves_sequence_order() {
        let mut store = ElementStore::default();
        let ids = [store.add_text(), store.add_image("data:,x"), store.add_text()];
        let view = render_canvas(&store, &HashMap::new());
        let drawn: Vec<_> = view.elements.iter().map(|el| el.id).collect();
        assert_eq!(drawn, ids);
    }

    #[test]
    fn test_without_chrome() {
        let mut store = ElementStore::default();
        store.add_text();
        let view = render_canvas(&store, &HashMap::new()).without_chrome();
        assert!(view.elements.iter().all(|el| el.chrome == ChromeView::default()));
    }
}
