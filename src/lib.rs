#![forbid(unsafe_code)]

//! `flashpoint-launcher` — Flashpoint library host.
//!
//! Reads a game catalog and playlist from a Flashpoint installation and
//! launches games through the `CLIFp` helper executable, supervising the
//! hand-off from the short-lived helper to the real target process and
//! reporting started/stopped lifecycle events to the host.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod play;

pub use config::LauncherConfig;
pub use errors::{AppError, Result};
