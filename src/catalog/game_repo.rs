//! Game record queries against the catalog database.

use sqlx::FromRow;

use crate::Result;

use super::db::CatalogPool;

/// Raw row from the catalog `game` table.
///
/// Column names match the Flashpoint schema; the numeric-looking columns
/// are stored as text and parsed when the library entry is assembled.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct GameRow {
    /// Catalog identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Version string.
    pub version: Option<String>,
    /// Long-form description from the curation.
    #[sqlx(rename = "originalDescription")]
    pub original_description: Option<String>,
    /// Last play timestamp, RFC 3339 text (e.g. `2026-01-22T12:04:10.702Z`).
    #[sqlx(rename = "lastPlayed")]
    pub last_played: Option<String>,
    /// Accumulated playtime in seconds, as text.
    pub playtime: Option<String>,
    /// Number of play sessions, as text.
    #[sqlx(rename = "playCounter")]
    pub play_counter: Option<String>,
    /// Logo image path relative to `Data/Images`.
    #[sqlx(rename = "logoPath")]
    pub logo_path: Option<String>,
    /// Screenshot image path relative to `Data/Images`.
    #[sqlx(rename = "screenshotPath")]
    pub screenshot_path: Option<String>,
}

/// Repository wrapper around the catalog pool for game records.
#[derive(Clone)]
pub struct GameRepo {
    pool: CatalogPool,
}

impl GameRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(pool: CatalogPool) -> Self {
        Self { pool }
    }

    /// Fetch one game record by catalog identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the query fails.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<GameRow>> {
        let row = sqlx::query_as::<_, GameRow>(
            "SELECT id, title, version, originalDescription, lastPlayed, \
             playtime, playCounter, logoPath, screenshotPath \
             FROM game WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
