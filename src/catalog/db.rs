//! Read-only `SQLite` connection to the Flashpoint catalog.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::{AppError, Result};

/// Alias for the shared catalog connection pool.
pub type CatalogPool = SqlitePool;

/// Open the catalog database in read-only mode.
///
/// The catalog belongs to the Flashpoint installation; this process never
/// writes to it.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the database file does not exist, or
/// `AppError::Catalog` if the connection fails.
pub async fn connect_read_only(path: &Path) -> Result<CatalogPool> {
    if !path.is_file() {
        return Err(AppError::NotFound(format!(
            "catalog database not found: {}",
            path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(AppError::from)
}
