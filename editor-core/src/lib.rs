//! # Canvas Editor Core
//!
//! Element model and interaction logic for a fixed-size canvas editor.
//! Compiles to WASM so the browser host can drive it directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐  actions  ┌───────────────┐  view   ┌──────────────┐
//! │ Control Panel │ ────────▶ │ Element Store │ ──────▶ │ Canvas View  │
//! └───────────────┘           └───────────────┘         └──────────────┘
//!                                     ▲                         │
//!                                     │   drag / resize / blur  │
//!                             ┌───────┴────────┐                │
//!                             │  Controllers   │ ◀──────────────┘
//!                             └────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod interaction;
pub mod panel;
pub mod store;
pub mod upload;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use editor::{Editor, PanelEffect, UiEvent, UploadOutcome};
pub use element::{CanvasElement, ElementId, ElementKind, ElementPatch, Geometry, Rect};
pub use error::{EditorError, EditorResult};
pub use interaction::{
    CanvasBounds, ControlPolicy, DragStop, ElementController, FocusTarget, HideReason,
    ResizeReport, Visibility,
};
pub use panel::{ButtonAction, ButtonKind, PanelAction, PanelButton, PANEL_BUTTONS};
pub use store::{Background, ElementStore};
pub use upload::{
    encode_data_url, parse_data_url, DataUrl, FileSelection, ImageFormat, UploadTarget,
    UploadTicket,
};
pub use view::{render_canvas, BackgroundView, CanvasView, ChromeView, ContentView, ElementView};

/// Editor core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
