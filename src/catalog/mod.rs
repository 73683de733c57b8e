//! Flashpoint catalog access.
//!
//! Covers read-only access to the `flashpoint.sqlite` catalog database,
//! playlist file parsing, and assembly of library entries from the two.

pub mod db;
pub mod game_repo;
pub mod library;
pub mod playlist;
