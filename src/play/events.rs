//! Lifecycle events delivered to the host.
//!
//! The only observable output of a play session is one `Started` followed
//! by one `Stopped`, delivered over a `tokio::sync::mpsc` channel owned by
//! the host. Nothing from inside the supervisor loop is ever surfaced as a
//! synchronous failure.

use serde::{Deserialize, Serialize};

/// Which path terminated a session. Diagnostic only; hosts that care
/// solely about started/stopped can ignore it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The discovered target process exited.
    TargetExited,
    /// The helper exited without a detectable target ever appearing.
    /// A normal outcome, e.g. the user cancelled inside the helper's UI.
    HelperExited,
    /// Cancellation was requested by the host.
    Cancelled,
    /// The helper process could not be created; no supervisor ran.
    LaunchFailed,
}

/// Events emitted during a play session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Launch attempt accepted: the helper process was created.
    /// Does not mean the target is running.
    Started {
        /// Session the helper was started for.
        session_id: String,
        /// Namespaced game identifier.
        game_id: String,
    },
    /// The session reached its terminal state; all handles are released.
    Stopped {
        /// Session that terminated.
        session_id: String,
        /// Namespaced game identifier.
        game_id: String,
        /// Which path terminated the session.
        outcome: SessionOutcome,
    },
}

impl SessionEvent {
    /// Get the session ID from any event.
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::Started { session_id, .. } | Self::Stopped { session_id, .. } => session_id,
        }
    }
}
