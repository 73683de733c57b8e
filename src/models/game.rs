//! Game library entry model.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One game exposed to the host library, assembled from a playlist entry
/// and its catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GameEntry {
    /// Display title from the catalog.
    pub name: String,
    /// Namespaced identifier (`<prefix><catalog id>`); the value passed
    /// back to the launcher when the host starts this game.
    pub game_id: String,
    /// Curator notes from the playlist entry.
    pub description: Option<String>,
    /// Catalog version string.
    pub version: Option<String>,
    /// Accumulated playtime in seconds.
    pub playtime_seconds: u64,
    /// Number of recorded play sessions.
    pub play_count: u64,
    /// Most recent play timestamp, if the game has ever been played.
    pub last_activity: Option<DateTime<Utc>>,
    /// Absolute path to the logo image.
    pub logo_path: PathBuf,
    /// Absolute path to the screenshot image.
    pub screenshot_path: PathBuf,
    /// Flashpoint games are playable as soon as they are listed.
    pub is_installed: bool,
}
