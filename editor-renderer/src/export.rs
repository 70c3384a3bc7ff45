//! Canvas export to PNG.
//!
//! Draws a [`CanvasView`] to an SVG document and rasterizes it with the
//! resvg/tiny-skia pipeline. Editing chrome is never drawn; only the
//! background and the element contents end up in the image.

use std::fmt::Write;

use base64::Engine;
use editor_core::{BackgroundView, CanvasView, ContentView, EditorConfig, ElementView};

use crate::error::{RenderError, RenderResult};
use crate::image::load_image_from_data_uri;

/// Opacity of the placeholder shown in empty text elements.
const PLACEHOLDER_OPACITY: f32 = 0.25;

/// Configuration for canvas export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output width in pixels (default: canvas width).
    pub width: Option<u32>,
    /// Output height in pixels (default: canvas height).
    pub height: Option<u32>,
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
    /// Load the system fonts before rasterizing. Without fonts text is
    /// skipped.
    pub load_system_fonts: bool,
    /// Font family used for text elements.
    pub font_family: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: 1.0,
            load_system_fonts: true,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl ExportConfig {
    /// Export configuration matching the editor's canvas size.
    #[must_use]
    pub fn from_editor(config: &EditorConfig) -> Self {
        Self {
            width: Some(config.canvas_width),
            height: Some(config.canvas_height),
            ..Self::default()
        }
    }
}

/// Exports a [`CanvasView`] to SVG and PNG.
#[derive(Debug, Clone)]
pub struct CanvasExporter {
    config: ExportConfig,
}

impl CanvasExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Exporter configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export the canvas to PNG bytes.
    ///
    /// Every image on the canvas is decoded first so broken content fails
    /// the export instead of leaving a hole in the picture.
    ///
    /// # Errors
    ///
    /// Returns an error if an image cannot be decoded or rendering or
    /// encoding fails.
    pub fn render_to_png(&self, view: &CanvasView) -> RenderResult<Vec<u8>> {
        check_images(view)?;
        let svg_string = self.render_to_svg(view)?;
        let pixmap = self.rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the canvas to a `data:image/png;base64,…` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Self::render_to_png`] fails.
    pub fn render_to_data_url(&self, view: &CanvasView) -> RenderResult<String> {
        self.render_to_png(view).map(|png| png_data_url(&png))
    }

    /// Export the canvas to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas cannot be represented as SVG.
    pub fn render_to_svg(&self, view: &CanvasView) -> RenderResult<String> {
        let (out_w, out_h) = self.output_dimensions(view);
        let view_w = view.width.max(1);
        let view_h = view.height.max(1);

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\" preserveAspectRatio=\"none\">",
        );

        render_background_svg(&mut svg, &view.background);

        for element in &view.elements {
            self.render_element_svg(&mut svg, element);
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Output dimensions (width, height) in pixels.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn output_dimensions(&self, view: &CanvasView) -> (u32, u32) {
        let base_w = self.config.width.unwrap_or(view.width);
        let base_h = self.config.height.unwrap_or(view.height);

        let out_w = (base_w as f32 * self.config.scale) as u32;
        let out_h = (base_h as f32 * self.config.scale) as u32;
        (out_w.max(1), out_h.max(1))
    }

    fn render_element_svg(&self, svg: &mut String, element: &ElementView) {
        let rect = &element.rect;

        match &element.content {
            ContentView::Text {
                content,
                placeholder,
                color,
                font_size,
            } => {
                let (text, opacity) = if content.is_empty() {
                    (placeholder.as_str(), PLACEHOLDER_OPACITY)
                } else {
                    (content.as_str(), 1.0)
                };
                let escaped = escape_xml(text);
                let escaped_color = escape_xml(color);
                let family = escape_xml(&self.config.font_family);
                let center_x = rect.x + rect.width / 2.0;
                let center_y = rect.y + rect.height / 2.0;
                let _ = write!(
                    svg,
                    "<text x=\"{center_x}\" y=\"{center_y}\" font-size=\"{font_size}\" fill=\"{escaped_color}\" fill-opacity=\"{opacity}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{family}\">{escaped}</text>",
                );
            }

            ContentView::Image { source } => {
                let escaped_src = escape_xml(source);
                let clip_id = format!("clip-{}", element.id);
                let _ = write!(
                    svg,
                    "<clipPath id=\"{clip_id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
                    rect.x, rect.y, rect.width, rect.height,
                );
                let _ = write!(
                    svg,
                    "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid slice\" clip-path=\"url(#{clip_id})\" xlink:href=\"{escaped_src}\"/>",
                    rect.x, rect.y, rect.width, rect.height,
                );
            }
        }
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(&self, svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        if self.config.load_system_fonts {
            opt.fontdb_mut().load_system_fonts();
        }
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Encode PNG bytes as a data URL.
#[must_use]
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

fn render_background_svg(svg: &mut String, background: &BackgroundView) {
    match background {
        BackgroundView::Color { color } => {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(color)
            );
        }
        BackgroundView::Image { source, color } => {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(color)
            );
            let _ = write!(
                svg,
                "<image width=\"100%\" height=\"100%\" preserveAspectRatio=\"xMidYMid slice\" xlink:href=\"{}\"/>",
                escape_xml(source)
            );
        }
    }
}

fn check_images(view: &CanvasView) -> RenderResult<()> {
    if let BackgroundView::Image { source, .. } = &view.background {
        load_image_from_data_uri(source)?;
    }
    for element in &view.elements {
        if let ContentView::Image { source } = &element.content {
            load_image_from_data_uri(source).map_err(|e| {
                RenderError::Resource(format!("element {}: {e}", element.id))
            })?;
        }
    }
    Ok(())
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
