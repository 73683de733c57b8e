//! In-process registry of running session supervisors.
//!
//! Supervisor tasks are fire-and-forget from the caller's point of view,
//! so the registry owns their cancellation tokens and join handles keyed
//! by session ID. Orphaned polling loops can then be force-cancelled on
//! host shutdown instead of leaking.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A registered supervisor task.
struct ActiveSession {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Registry of live session supervisors keyed by session ID.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, ActiveSession>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly spawned supervisor task.
    ///
    /// A task that already finished (and removed itself) is not inserted,
    /// so registration racing a very short session cannot leave a stale
    /// entry behind.
    pub async fn register(&self, session_id: &str, cancel: CancellationToken, join: JoinHandle<()>) {
        let mut sessions = self.sessions.lock().await;
        if join.is_finished() {
            return;
        }
        if sessions
            .insert(session_id.to_owned(), ActiveSession { cancel, join })
            .is_some()
        {
            warn!(session_id, "replaced an existing registry entry");
        }
    }

    /// Drop a session from the registry. Called by the supervisor itself
    /// on exit; a no-op when the entry is already gone.
    pub async fn remove(&self, session_id: &str) {
        self.sessions.lock().await.remove(session_id);
    }

    /// Request cancellation of one session. Returns whether the session
    /// was present; cancelling an unknown or already-terminated session is
    /// a no-op.
    pub async fn cancel(&self, session_id: &str) -> bool {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).is_some_and(|session| {
            session.cancel.cancel();
            true
        })
    }

    /// Cancel every active supervisor and wait for the tasks to exit.
    pub async fn shutdown_all(&self) {
        let drained: Vec<(String, ActiveSession)> =
            self.sessions.lock().await.drain().collect();

        if drained.is_empty() {
            return;
        }

        info!(count = drained.len(), "cancelling active play sessions");
        for (_, session) in &drained {
            session.cancel.cancel();
        }
        for (session_id, session) in drained {
            if let Err(err) = session.join.await {
                warn!(session_id, %err, "supervisor task did not shut down cleanly");
            }
        }
    }

    /// Number of currently tracked sessions.
    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether a session is currently tracked.
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().await.contains_key(session_id)
    }
}
