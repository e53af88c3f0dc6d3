//! Durable storage for the selected link mode.
//!
//! One TOML file, one key. Read once at startup, written after every apply
//! attempt, success or failure, so the last *requested* mode is retried on
//! the next session even when the host rejected it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::constants::storage;
use crate::mode::LinkMode;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSelection {
    mode: String,
}

/// On-disk home of the current mode selection.
#[derive(Debug)]
pub struct ModeStore {
    path: PathBuf,
}

impl ModeStore {
    /// Store at the standard per-user config location.
    pub fn open() -> Self {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(storage::APP_DIR);
        path.push(storage::FILENAME);
        Self { path }
    }

    /// Store at an explicit path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted selection.
    ///
    /// A missing file means no prior selection; unreadable or unrecognized
    /// content is normalized to the default rather than rejected, so a
    /// hand-edited or corrupted file never wedges startup.
    pub fn load(&self) -> LinkMode {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => {
                info!(path = %self.path.display(), "no saved mode, defaulting to SPLINE");
                return LinkMode::Spline;
            }
        };

        let stored = match toml::from_str::<StoredSelection>(&contents) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse saved mode, defaulting to SPLINE");
                return LinkMode::Spline;
            }
        };

        match LinkMode::from_name(&stored.mode) {
            Some(mode) => {
                info!(mode = %mode, "restored saved mode");
                mode
            }
            None => {
                warn!(value = %stored.mode, "unrecognized saved mode, defaulting to SPLINE");
                LinkMode::Spline
            }
        }
    }

    /// Write `mode` as the current selection.
    pub fn save(&self, mode: LinkMode) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(&StoredSelection {
            mode: mode.name().to_string(),
        })
        .context("Failed to serialize saved mode")?;
        fs::write(&self.path, contents)
            .context(format!("Failed to write saved mode to {}", self.path.display()))?;
        Ok(())
    }
}
