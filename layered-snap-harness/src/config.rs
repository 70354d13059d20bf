//! Snapshot configuration: where snapshots live and whether to update them.

use crate::errors::{SnapError, SnapResult};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Environment variable that turns update mode on.
pub const UPDATE_ENV_VAR: &str = "SNAP_UPDATE";

/// Name of the optional config file in the crate root.
pub const CONFIG_FILE_NAME: &str = "snap.toml";

/// Default directory, relative to the test source file.
pub const DEFAULT_SNAPSHOT_DIR: &str = "__snapshots__";

/// Whether stored snapshots are compared against or overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Compare and fail on mismatch.
    Off,
    /// Overwrite stored snapshots with the current output.
    On,
}

impl UpdateMode {
    pub fn is_on(self) -> bool {
        self == UpdateMode::On
    }

    /// Interpret the value of [`UPDATE_ENV_VAR`].
    ///
    /// `1`, `true`, `yes` and `on` (any case) enable update mode.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => UpdateMode::On,
            _ => UpdateMode::Off,
        }
    }

    /// Update mode for this process, from [`UPDATE_ENV_VAR`].
    ///
    /// Command-line arguments are not consulted. Read once; later changes to
    /// the environment are ignored.
    pub fn detect() -> Self {
        static DETECTED: OnceCell<UpdateMode> = OnceCell::new();
        *DETECTED.get_or_init(|| Self::from_env_value(std::env::var(UPDATE_ENV_VAR).ok().as_deref()))
    }
}

impl From<bool> for UpdateMode {
    fn from(on: bool) -> Self {
        if on {
            UpdateMode::On
        } else {
            UpdateMode::Off
        }
    }
}

/// On-disk form of `snap.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    snapshot_dir: Option<String>,
    /// Forces update mode on. `false` defers to the environment.
    #[serde(default)]
    update: Option<bool>,
}

/// Configuration for snapshot assertions.
#[derive(Debug, Clone)]
pub struct SnapConfig {
    /// Snapshot directory, relative to the directory of the test source
    /// file. An absolute path is used as is.
    pub snapshot_dir: String,
    pub update: UpdateMode,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: DEFAULT_SNAPSHOT_DIR.to_string(),
            update: UpdateMode::detect(),
        }
    }
}

impl SnapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> SnapResult<Self> {
        let mut config = Self::default();
        if !path.exists() {
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|e| SnapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| SnapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(dir) = file.snapshot_dir {
            if dir.trim().is_empty() {
                return Err(SnapError::Config {
                    path: path.to_path_buf(),
                    message: "snapshot_dir must not be empty".to_string(),
                });
            }
            config.snapshot_dir = dir;
        }
        if file.update == Some(true) {
            config.update = UpdateMode::On;
        }

        Ok(config)
    }

    /// Load `snap.toml` from a crate root.
    pub fn for_manifest_dir(manifest_dir: &Path) -> SnapResult<Self> {
        Self::load(&manifest_dir.join(CONFIG_FILE_NAME))
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<String>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_update(mut self, update: impl Into<UpdateMode>) -> Self {
        self.update = update.into();
        self
    }
}
