//! Control panel: the buttons beside the canvas and the actions they fire.

use serde::{Deserialize, Serialize};

use crate::upload::{FileSelection, ACCEPT_IMAGES};

/// An action fired from the control panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PanelAction {
    /// Add a text element.
    AddText,
    /// Add an image element from the picked file.
    AddImage {
        /// Picked file; `None` if the picker was dismissed.
        #[serde(default)]
        file: Option<FileSelection>,
    },
    /// Set the background image from the picked file.
    SetBackground {
        /// Picked file; `None` if the picker was dismissed.
        #[serde(default)]
        file: Option<FileSelection>,
    },
    /// Clear the canvas.
    Reset,
    /// Export the canvas as PNG.
    Export,
}

/// How a panel button is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Plain button.
    Button,
    /// File input disguised as a button; clicking opens the file chooser.
    FileInput {
        /// MIME filter of the chooser.
        accept: &'static str,
    },
}

/// Which action a button fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// [`PanelAction::Reset`].
    Reset,
    /// [`PanelAction::AddText`].
    AddText,
    /// [`PanelAction::AddImage`].
    AddImage,
    /// [`PanelAction::SetBackground`].
    SetBackground,
    /// [`PanelAction::Export`].
    Export,
}

/// A button in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelButton {
    /// Visible label.
    pub label: &'static str,
    /// Presentation.
    pub kind: ButtonKind,
    /// Action fired on click or file selection.
    pub action: ButtonAction,
}

/// The control panel layout, in display order.
pub const PANEL_BUTTONS: [PanelButton; 5] = [
    PanelButton {
        label: "Reset",
        kind: ButtonKind::Button,
        action: ButtonAction::Reset,
    },
    PanelButton {
        label: "Text",
        kind: ButtonKind::Button,
        action: ButtonAction::AddText,
    },
    PanelButton {
        label: "Image",
        kind: ButtonKind::FileInput {
            accept: ACCEPT_IMAGES,
        },
        action: ButtonAction::AddImage,
    },
    PanelButton {
        label: "Background",
        kind: ButtonKind::FileInput {
            accept: ACCEPT_IMAGES,
        },
        action: ButtonAction::SetBackground,
    },
    PanelButton {
        label: "Export to PNG",
        kind: ButtonKind::Button,
        action: ButtonAction::Export,
    },
];

impl ButtonAction {
    /// Build the panel action for this button.
    ///
    /// `file` is the picker result and is only used by file inputs.
    #[must_use]
    pub fn into_action(self, file: Option<FileSelection>) -> PanelAction {
        match self {
            Self::Reset => PanelAction::Reset,
            Self::AddText => PanelAction::AddText,
            Self::AddImage => PanelAction::AddImage { file },
            Self::SetBackground => PanelAction::SetBackground { file },
            Self::Export => PanelAction::Export,
        }
    }
}
