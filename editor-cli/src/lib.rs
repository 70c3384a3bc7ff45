//! # Canvas Editor CLI
//!
//! Headless host for the canvas editor. Replays a script of control panel
//! actions and gestures against an editor session, reads uploaded files
//! asynchronously and writes the exported PNG to disk.
//!
//! ## Usage
//!
//! ```bash
//! editor-cli --script poster.json --out-dir out/
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved configuration (config file plus overrides)
//! - `ScriptStep` - One step of a script
//! - `ScriptRunner` - Plays a script against an `Editor`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod app;
mod script;

pub use app::{RunReport, ScriptRunner};
pub use script::{load_script, parse_script, ScriptStep};

use std::path::{Path, PathBuf};

use clap::Parser;
use editor_core::{EditorConfig, EditorError};
use thiserror::Error;

/// Errors raised while setting up a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid.
    #[error("Invalid config {path}: {source}")]
    Config {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        source: EditorError,
    },

    /// The script is not valid.
    #[error("Invalid script {path}: {source}")]
    Script {
        /// Script file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Command-line arguments for editor-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "editor-cli")]
#[command(about = "Replay a canvas editor script and export canvas.png")]
#[command(version)]
pub struct CliArgs {
    /// JSON script of panel actions and gestures
    #[arg(long)]
    pub script: PathBuf,

    /// Directory the exported PNG is written to
    #[arg(long, env = "EDITOR_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// JSON editor config (palette, colors, canvas size)
    #[arg(long, env = "EDITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels, overrides the config file
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels, overrides the config file
    #[arg(long)]
    pub height: Option<u32>,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Script to replay.
    pub script: PathBuf,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Editor configuration.
    pub editor: EditorConfig,
}

impl CliConfig {
    /// Resolve the configuration: defaults, then the config file, then the
    /// size flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load(args: CliArgs) -> Result<Self, CliError> {
        let mut editor = match &args.config {
            Some(path) => read_config(path)?,
            None => EditorConfig::default(),
        };
        if let Some(width) = args.width {
            editor.canvas_width = width;
        }
        if let Some(height) = args.height {
            editor.canvas_height = height;
        }
        Ok(Self {
            script: args.script,
            out_dir: args.out_dir,
            editor,
        })
    }
}

fn read_config(path: &Path) -> Result<EditorConfig, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    EditorConfig::from_json(&json).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}
