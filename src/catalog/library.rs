//! Library assembly: playlist entries joined with catalog records.

use chrono::{DateTime, Utc};
use tracing::{info, info_span};

use crate::config::LauncherConfig;
use crate::models::game::GameEntry;
use crate::{AppError, Result};

use super::db::CatalogPool;
use super::game_repo::{GameRepo, GameRow};
use super::playlist::{self, Playlist};

/// Load the configured collection as a list of library entries.
///
/// Mirrors the host's "get games" flow: resolve the playlist file, then
/// look up each referenced game in the catalog and join the two.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the playlist or a referenced game is
/// missing, or `AppError::Catalog` / `AppError::Playlist` on read failures.
pub async fn load_entries(config: &LauncherConfig, pool: &CatalogPool) -> Result<Vec<GameEntry>> {
    let span = info_span!("load_entries");
    let _guard = span.enter();

    let playlist_path = playlist::resolve_collection_file(config)?;
    let playlist = Playlist::load(&playlist_path)?;
    info!(
        collection = playlist.title,
        games = playlist.games.len(),
        "playlist loaded"
    );

    let repo = GameRepo::new(pool.clone());
    let mut entries = Vec::with_capacity(playlist.games.len());

    for item in &playlist.games {
        let row = repo.fetch_by_id(&item.game_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "playlist references game {} which is not in the catalog",
                item.game_id
            ))
        })?;
        entries.push(build_entry(config, row, item.notes.clone())?);
    }

    Ok(entries)
}

/// Join one catalog row with its playlist notes into a library entry.
fn build_entry(
    config: &LauncherConfig,
    row: GameRow,
    notes: Option<String>,
) -> Result<GameEntry> {
    let images_dir = config.images_dir();
    let logo_path = images_dir.join(row.logo_path.unwrap_or_default());
    let screenshot_path = images_dir.join(row.screenshot_path.unwrap_or_default());

    let last_activity = row
        .last_played
        .as_deref()
        .map(parse_last_played)
        .transpose()?;

    Ok(GameEntry {
        name: row.title,
        game_id: format!("{}{}", config.game_id_prefix, row.id),
        description: notes,
        version: row.version,
        playtime_seconds: parse_counter(row.playtime.as_deref(), "playtime")?,
        play_count: parse_counter(row.play_counter.as_deref(), "playCounter")?,
        last_activity,
        logo_path,
        screenshot_path,
        is_installed: true,
    })
}

fn parse_counter(raw: Option<&str>, column: &str) -> Result<u64> {
    match raw {
        None => Ok(0),
        Some(text) => text
            .parse()
            .map_err(|err| AppError::Catalog(format!("invalid {column} value '{text}': {err}"))),
    }
}

fn parse_last_played(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|err| AppError::Catalog(format!("invalid lastPlayed value '{raw}': {err}")))
}
