//! Launcher configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Polling cadence for the two supervision phases.
///
/// Resolution re-enumerates all processes, so it polls fast over a short
/// window; attachment polls a single known PID and may run for hours, so
/// it is deliberately coarser.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SupervisionConfig {
    /// Interval between process scans while resolving the target.
    #[serde(default = "default_resolve_poll_ms")]
    pub resolve_poll_ms: u64,
    /// Interval between liveness checks once attached to the target.
    #[serde(default = "default_attach_poll_ms")]
    pub attach_poll_ms: u64,
}

impl Default for SupervisionConfig {
    fn default() -> Self {
        Self {
            resolve_poll_ms: default_resolve_poll_ms(),
            attach_poll_ms: default_attach_poll_ms(),
        }
    }
}

impl SupervisionConfig {
    /// Resolution-phase poll interval.
    #[must_use]
    pub fn resolve_poll(&self) -> Duration {
        Duration::from_millis(self.resolve_poll_ms)
    }

    /// Attachment-phase poll interval.
    #[must_use]
    pub fn attach_poll(&self) -> Duration {
        Duration::from_millis(self.attach_poll_ms)
    }
}

fn default_resolve_poll_ms() -> u64 {
    500
}

fn default_attach_poll_ms() -> u64 {
    1000
}

fn default_game_id_prefix() -> String {
    "flashpoint-".into()
}

fn default_helper_relative_path() -> PathBuf {
    ["CLIFp", "bin", "clifp-c.exe"].iter().collect()
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LauncherConfig {
    /// Flashpoint installation root.
    pub install_directory: PathBuf,
    /// Display title of the playlist to expose as the library.
    #[serde(default)]
    pub collection_name: Option<String>,
    /// Playlist filename under `Data/Playlists`; resolved from
    /// `collection_name` when absent.
    #[serde(default)]
    pub collection_filename: Option<String>,
    /// Namespacing prefix stripped from game identifiers before they are
    /// passed to the helper.
    #[serde(default = "default_game_id_prefix")]
    pub game_id_prefix: String,
    /// Helper executable location relative to the installation root.
    #[serde(default = "default_helper_relative_path")]
    pub helper_relative_path: PathBuf,
    /// Supervision polling cadence.
    #[serde(default)]
    pub supervision: SupervisionConfig,
}

impl LauncherConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and normalize paths.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Path to the catalog database inside the installation.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.install_directory.join("Data").join("flashpoint.sqlite")
    }

    /// Directory holding playlist JSON files.
    #[must_use]
    pub fn playlists_dir(&self) -> PathBuf {
        self.install_directory.join("Data").join("Playlists")
    }

    /// Directory holding game logo and screenshot images.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.install_directory.join("Data").join("Images")
    }

    /// Absolute path to the `CLIFp` helper executable.
    #[must_use]
    pub fn helper_path(&self) -> PathBuf {
        self.install_directory.join(&self.helper_relative_path)
    }

    fn validate(&mut self) -> Result<()> {
        if self.game_id_prefix.is_empty() {
            return Err(AppError::Config("game_id_prefix must not be empty".into()));
        }

        if self.supervision.resolve_poll_ms == 0 || self.supervision.attach_poll_ms == 0 {
            return Err(AppError::Config(
                "supervision poll intervals must be greater than zero".into(),
            ));
        }

        if self.collection_name.is_none() && self.collection_filename.is_none() {
            return Err(AppError::Config(
                "either collection_name or collection_filename must be set".into(),
            ));
        }

        let canonical_root = self
            .install_directory
            .canonicalize()
            .map_err(|err| AppError::Config(format!("install_directory invalid: {err}")))?;
        self.install_directory = canonical_root;

        Ok(())
    }
}
