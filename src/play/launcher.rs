//! Game launcher: helper process creation and supervisor hand-off.
//!
//! Launch returns as soon as the helper process has been created; the
//! supervisor task runs detached and reports the rest of the lifecycle
//! through the event channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span};

use crate::config::LauncherConfig;
use crate::models::session::Session;
use crate::{AppError, Result};

use super::command::HelperCommand;
use super::events::{SessionEvent, SessionOutcome};
use super::probe::{ProcessProbe, SystemProbe};
use super::registry::SessionRegistry;
use super::supervisor::{SessionHandle, Supervisor};

/// Launches games through the `CLIFp` helper and hands each one to a
/// detached supervisor.
pub struct Launcher {
    config: Arc<LauncherConfig>,
    registry: Arc<SessionRegistry>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl Launcher {
    /// Create a launcher bound to an event channel and session registry.
    #[must_use]
    pub fn new(
        config: Arc<LauncherConfig>,
        registry: Arc<SessionRegistry>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            config,
            registry,
            event_tx,
        }
    }

    /// Launch a game by its namespaced identifier.
    ///
    /// Emits `Started` immediately after the helper process is created and
    /// returns without waiting for the target to appear. On creation
    /// failure a single `Stopped` event is emitted instead and the error
    /// is returned; no supervisor runs.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Launch` if the helper process cannot be created.
    pub async fn launch(&self, game_id: &str) -> Result<SessionHandle> {
        self.launch_with_probe(game_id, SystemProbe::new()).await
    }

    /// Launch with a specific process probe. Exposed so hosts (and tests)
    /// can substitute a stronger identification strategy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Launch` if the helper process cannot be created.
    pub async fn launch_with_probe<P>(&self, game_id: &str, probe: P) -> Result<SessionHandle>
    where
        P: ProcessProbe + 'static,
    {
        let span = info_span!("launch", game_id);
        let _guard = span.enter();

        let helper_path = self.config.helper_path();
        let session = Session::new(game_id, &helper_path)?;
        let command = HelperCommand::build(&self.config.game_id_prefix, game_id, &helper_path)?;

        info!(helper = %helper_path.display(), "starting helper process");

        let child = match command.into_command().spawn() {
            Ok(child) => child,
            Err(err) => {
                error!(%err, helper = %helper_path.display(), "failed to start helper process");
                self.emit(SessionEvent::Stopped {
                    session_id: session.id.clone(),
                    game_id: session.game_id.clone(),
                    outcome: SessionOutcome::LaunchFailed,
                })
                .await;
                return Err(AppError::Launch(format!(
                    "failed to start helper {}: {err}",
                    helper_path.display()
                )));
            }
        };

        info!(
            session_id = session.id,
            pid = child.id().unwrap_or(0),
            "helper process started"
        );

        // Started must precede any supervisor polling.
        self.emit(SessionEvent::Started {
            session_id: session.id.clone(),
            game_id: session.game_id.clone(),
        })
        .await;

        let cancel = CancellationToken::new();
        let supervisor = Supervisor::new(
            session.clone(),
            child,
            probe,
            &self.config.supervision,
            self.event_tx.clone(),
            cancel.clone(),
        )
        .with_registry(Arc::clone(&self.registry));

        let (handle, join) = supervisor.spawn();
        self.registry.register(&session.id, cancel, join).await;

        Ok(handle)
    }

    async fn emit(&self, event: SessionEvent) {
        if self.event_tx.send(event).await.is_err() {
            error!("lifecycle listener dropped; event discarded");
        }
    }
}
