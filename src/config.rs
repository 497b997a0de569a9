//! Per-user settings stored in the OS config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::timeline::{RowColumnWidth, DEFAULT_SLOT_WIDTH, SCROLL_COLLAPSE_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Pixels per slot.
    pub slot_width: f64,
    pub row_column_width: RowColumnWidth,
    /// Scroll offset in pixels past which the row column collapses.
    pub collapse_threshold: f64,
    /// How often a host should re-sample its clock for the now line.
    pub now_refresh_seconds: u64,
    /// Width assumed for the visible grid when no container is measured.
    pub container_width: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slot_width: DEFAULT_SLOT_WIDTH,
            row_column_width: RowColumnWidth::default(),
            collapse_threshold: SCROLL_COLLAPSE_THRESHOLD,
            now_refresh_seconds: 60,
            container_width: 1000.0,
        }
    }
}

impl Settings {
    /// Default location: `<config dir>/ShiftTimeline/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ShiftTimeline")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::default_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing file or keys fall back to defaults; an unreadable file is
    /// reported and ignored.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read settings");
                return Self::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
            Self::default()
        })
    }
}
