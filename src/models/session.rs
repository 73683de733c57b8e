//! Play session model and lifecycle states.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

/// Lifecycle state for a play session's supervisor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Helper process created; supervisor not yet polling.
    Launching,
    /// Scanning running processes for the target by name.
    Resolving,
    /// Target acquired; polling a single PID for exit.
    Attached,
    /// Terminal state; handles released, stop event emitted.
    Terminated,
}

impl SessionState {
    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Launching, Self::Resolving)
                | (Self::Resolving, Self::Attached | Self::Terminated)
                | (Self::Attached, Self::Terminated)
        )
    }

    /// Whether this is the terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Terminated
    }
}

/// One play session, created per launch request.
///
/// The target process name is derived once from the helper executable's
/// file stem and is immutable for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Namespaced game identifier the session was launched for.
    pub game_id: String,
    /// Executable name (without extension) expected for the target process.
    pub target_process_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Construct a new session for a game launched via the given helper.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Launch` if the helper path has no file name to
    /// derive the target process name from.
    pub fn new(game_id: impl Into<String>, helper_path: &Path) -> Result<Self> {
        let target_process_name = helper_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::Launch(format!(
                    "helper path has no file name: {}",
                    helper_path.display()
                ))
            })?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.into(),
            target_process_name,
            created_at: Utc::now(),
        })
    }
}
