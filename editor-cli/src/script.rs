//! Script format.
//!
//! A script is a JSON array of steps. Elements are addressed by their index
//! in drawing order at the time the step runs:
//!
//! ```json
//! [
//!   {"step": "add_text"},
//!   {"step": "type", "element": 0, "text": "Hello"},
//!   {"step": "add_image", "path": "cat.png"},
//!   {"step": "settle"},
//!   {"step": "resize", "element": 1, "width": 400, "height": 300, "x": 0, "y": 0},
//!   {"step": "export"}
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CliError;

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Press "Text".
    AddText,
    /// Pick a file with "Image". No `path` means the picker was dismissed.
    AddImage {
        /// File to upload, relative to the script.
        #[serde(default)]
        path: Option<PathBuf>,
        /// MIME type reported by the picker.
        #[serde(default)]
        mime: Option<String>,
    },
    /// Pick a file with "Background".
    SetBackground {
        /// File to upload, relative to the script.
        #[serde(default)]
        path: Option<PathBuf>,
        /// MIME type reported by the picker.
        #[serde(default)]
        mime: Option<String>,
    },
    /// Set the background color.
    SetBackgroundColor {
        /// Color as hex.
        color: String,
    },
    /// Press "Reset".
    Reset,
    /// Press "Export to PNG".
    Export,
    /// Wait for every pending file read to finish.
    Settle,
    /// Finish dragging an element.
    Drag {
        /// Element index.
        element: usize,
        /// Final x.
        x: f32,
        /// Final y.
        y: f32,
    },
    /// Resize an element.
    Resize {
        /// Element index.
        element: usize,
        /// New width.
        width: f32,
        /// New height.
        height: f32,
        /// New x.
        x: f32,
        /// New y.
        y: f32,
    },
    /// Move focus away from an element.
    Blur {
        /// Element index.
        element: usize,
        /// Focus moved to a child of the element.
        #[serde(default)]
        inside: bool,
    },
    /// Focus an element.
    Focus {
        /// Element index.
        element: usize,
    },
    /// Press an element's delete button.
    Remove {
        /// Element index.
        element: usize,
    },
    /// Replace the text of a text element.
    Type {
        /// Element index.
        element: usize,
        /// New text.
        text: String,
    },
    /// Pick a palette color for a text element.
    Color {
        /// Element index.
        element: usize,
        /// Palette color.
        color: String,
    },
    /// Tear the editor down.
    Unmount,
    /// Mount the editor again.
    Mount,
}

/// Parse a script from JSON.
///
/// # Errors
///
/// Returns an error if the JSON is not a list of steps.
pub fn parse_script(json: &str) -> serde_json::Result<Vec<ScriptStep>> {
    serde_json::from_str(json)
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&json).map_err(|source| CliError::Script {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_script() {
        let steps = parse_script(
            r##"[
                {"step": "add_text"},
                {"step": "color", "element": 0, "color": "#cf0000"},
                {"step": "add_image", "path": "cat.png"},
                {"step": "add_image"},
                {"step": "blur", "element": 0},
                {"step": "export"}
            ]"##,
        )
        .expect("parses");

        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], ScriptStep::AddText);
        assert_eq!(
            steps[2],
            ScriptStep::AddImage {
                path: Some(PathBuf::from("cat.png")),
                mime: None
            }
        );
        assert_eq!(steps[3], ScriptStep::AddImage { path: None, mime: None });
        assert_eq!(
            steps[4],
            ScriptStep::Blur {
                element: 0,
                inside: false
            }
        );
    }

    #[test]
    fn test_unknown_step_rejected() {
        assert!(parse_script(r#"[{"step": "rotate", "element": 0}]"#).is_err());
    }

    #[test]
    fn test_load_script_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").expect("write");
        let err = load_script(&path).expect_err("invalid");
        assert!(err.to_string().contains("broken.json"));
    }
}
