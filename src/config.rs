//! Startup configuration loaded from `editor.toml`.
//!
//! Every key is optional; a missing key keeps the editor's built-in default.
//!
//! ```toml
//! tool = "paint"
//! brush_size = 2
//! brush_shape = "circle"
//! primary_color = "#ff8800"
//! grid_active = false
//! max_undo_depth = 200
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{
    BrushShape, Color, CursorShape, DEFAULT_BASE_URL, DEFAULT_BRUSH_SIZE, DEFAULT_CLEAR_COLOR,
    DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR, Mode, ObjectModeState, RenderMode, StateValue,
    Tool,
};

/// Failure to load an [`EditorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Initial values for the shared state and the undo policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub tool: Tool,
    pub mode: Mode,
    pub render_mode: RenderMode,
    pub object_mode_state: ObjectModeState,
    pub brush_size: f32,
    pub brush_shape: BrushShape,
    pub cursor_shape: CursorShape,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub clear_color: Color,
    pub snap_active: bool,
    pub grid_active: bool,
    pub tree_show_internal: bool,
    pub fullscreen: bool,
    pub base_url: String,
    /// Oldest actions are dropped beyond this depth. Absent means unbounded.
    pub max_undo_depth: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            mode: Mode::default(),
            render_mode: RenderMode::default(),
            object_mode_state: ObjectModeState::default(),
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_shape: BrushShape::default(),
            cursor_shape: CursorShape::default(),
            primary_color: DEFAULT_PRIMARY_COLOR,
            secondary_color: DEFAULT_SECONDARY_COLOR,
            clear_color: DEFAULT_CLEAR_COLOR,
            snap_active: true,
            grid_active: true,
            tree_show_internal: false,
            fullscreen: false,
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_undo_depth: None,
        }
    }
}

impl EditorConfig {
    /// Parses a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The state values this config seeds, in field order.
    pub(crate) fn initial_values(&self) -> Vec<StateValue> {
        vec![
            StateValue::CurrentTool(self.tool),
            StateValue::CurrentMode(self.mode),
            StateValue::CurrentRenderMode(self.render_mode),
            StateValue::ObjectModeState(self.object_mode_state),
            StateValue::BrushSize(self.brush_size),
            StateValue::BrushShape(self.brush_shape),
            StateValue::CursorShape(self.cursor_shape),
            StateValue::PrimaryColor(self.primary_color),
            StateValue::SecondaryColor(self.secondary_color),
            StateValue::ClearColor(self.clear_color),
            StateValue::SnapActive(self.snap_active),
            StateValue::GridActive(self.grid_active),
            StateValue::TreeShowInternal(self.tree_show_internal),
            StateValue::Fullscreen(self.fullscreen),
        ]
    }
}

/// Loads a config from a TOML file.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    EditorConfig::from_toml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Loads a config, falling back to defaults if the file is missing or broken.
pub fn load_or_default(path: &Path) -> EditorConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded editor config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("No usable editor config ({e}), using defaults");
            EditorConfig::default()
        }
    }
}
