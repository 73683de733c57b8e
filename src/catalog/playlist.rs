//! Playlist (collection) file parsing and lookup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::config::LauncherConfig;
use crate::{AppError, Result};

/// One game reference inside a playlist file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PlaylistGame {
    /// Catalog identifier of the referenced game.
    #[serde(rename = "gameId")]
    pub game_id: String,
    /// Curator notes shown as the game description.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A Flashpoint playlist file. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    /// Display title of the collection.
    pub title: String,
    /// Ordered game references.
    #[serde(default)]
    pub games: Vec<PlaylistGame>,
}

impl Playlist {
    /// Read and parse one playlist file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the file does not exist, `AppError::Io`
    /// on other read failures, or `AppError::Playlist` on malformed JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                AppError::NotFound(format!("playlist file does not exist: {}", path.display()))
            } else {
                AppError::Io(format!("failed to read playlist {}: {err}", path.display()))
            }
        })?;
        serde_json::from_str(&raw).map_err(AppError::from)
    }
}

/// Resolve the playlist file for the configured collection.
///
/// An explicit `collection_filename` wins; otherwise the playlists
/// directory is scanned for a playlist whose title matches
/// `collection_name`.
///
/// # Errors
///
/// Returns `AppError::Config` if neither field is set, or the errors of
/// [`find_by_title`].
pub fn resolve_collection_file(config: &LauncherConfig) -> Result<PathBuf> {
    if let Some(filename) = &config.collection_filename {
        return Ok(config.playlists_dir().join(filename));
    }
    if let Some(title) = &config.collection_name {
        return find_by_title(&config.playlists_dir(), title);
    }
    Err(AppError::Config(
        "either collection_name or collection_filename must be set".into(),
    ))
}

/// Scan a playlists directory for the file whose playlist title matches.
///
/// The first match wins. Files that cannot be read or parsed are skipped
/// with a warning so one broken playlist cannot hide the rest.
///
/// # Errors
///
/// Returns `AppError::Playlist` if the directory cannot be globbed, or
/// `AppError::NotFound` if no playlist carries the requested title.
pub fn find_by_title(playlists_dir: &Path, title: &str) -> Result<PathBuf> {
    let pattern = playlists_dir.join("*.json");
    let pattern = pattern.to_str().ok_or_else(|| {
        AppError::Playlist(format!(
            "playlists directory is not valid UTF-8: {}",
            playlists_dir.display()
        ))
    })?;

    let paths = glob::glob(pattern)
        .map_err(|err| AppError::Playlist(format!("invalid playlist glob: {err}")))?;

    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, "skipping unreadable playlist path");
                continue;
            }
        };
        match Playlist::load(&path) {
            Ok(playlist) if playlist.title == title => return Ok(path),
            Ok(_) => {}
            Err(err) => {
                warn!(%err, path = %path.display(), "skipping unparsable playlist file");
            }
        }
    }

    Err(AppError::NotFound(format!(
        "collection '{title}' not found in Flashpoint playlists"
    )))
}
