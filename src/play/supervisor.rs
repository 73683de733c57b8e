//! Per-session supervisor: target resolution and exit watching.
//!
//! One supervisor task runs per launch. It moves through two phases:
//! *Resolution* scans all running processes for the expected target name
//! while the helper is alive, and *Attachment* polls the single acquired
//! PID until it exits. Exactly one `Stopped` event is emitted on every
//! exit path, after all handles are released.
//!
//! Resolution has no timeout: if the helper never exits and never spawns
//! a matching process, the supervisor polls until cancelled. This is a
//! known liveness risk accepted by design — the helper is expected to
//! either spawn the target quickly or exit quickly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use crate::config::SupervisionConfig;
use crate::models::session::{Session, SessionState};

use super::events::{SessionEvent, SessionOutcome};
use super::probe::{HelperHandle, ProcessProbe};
use super::registry::SessionRegistry;

/// Supervisor for one play session.
///
/// Generic over the helper handle and process probe so the state machine
/// is testable with scripted implementations.
pub struct Supervisor<H, P> {
    session: Session,
    helper: H,
    probe: P,
    resolve_poll: Duration,
    attach_poll: Duration,
    event_tx: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
    state_tx: watch::Sender<SessionState>,
    state_rx: watch::Receiver<SessionState>,
    registry: Option<Arc<SessionRegistry>>,
}

impl<H, P> Supervisor<H, P>
where
    H: HelperHandle + 'static,
    P: ProcessProbe + 'static,
{
    /// Construct a supervisor (does not start the task yet).
    #[must_use]
    pub fn new(
        session: Session,
        helper: H,
        probe: P,
        timing: &SupervisionConfig,
        event_tx: mpsc::Sender<SessionEvent>,
        cancel: CancellationToken,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::Launching);
        Self {
            session,
            helper,
            probe,
            resolve_poll: timing.resolve_poll(),
            attach_poll: timing.attach_poll(),
            event_tx,
            cancel,
            state_tx,
            state_rx,
            registry: None,
        }
    }

    /// Register with a session registry; the supervisor removes its entry
    /// when it terminates.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<SessionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Spawn the supervisor task, returning the caller-facing handle and
    /// the task's join handle.
    #[must_use]
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let handle = SessionHandle {
            session_id: self.session.id.clone(),
            game_id: self.session.game_id.clone(),
            cancel: self.cancel.clone(),
            state: self.state_rx.clone(),
        };
        let span = info_span!("supervisor", session_id = self.session.id);
        let join = tokio::spawn(self.run().instrument(span));
        (handle, join)
    }

    /// Core task body: supervise, then tear down exactly once.
    async fn run(mut self) {
        let outcome = self.supervise().await;
        self.finish(outcome).await;
    }

    /// Resolution and attachment phases; returns which path terminated
    /// the session.
    async fn supervise(&mut self) -> SessionOutcome {
        self.state_tx.send_replace(SessionState::Resolving);

        // ── Resolution: scan for the target by name ──────
        let target_pid = loop {
            if self.cancel.is_cancelled() {
                return SessionOutcome::Cancelled;
            }

            // Scan first: a match always wins over a helper exit observed
            // in the same iteration.
            match self
                .probe
                .find_pid_by_name(&self.session.target_process_name)
            {
                Ok(Some(pid)) => break pid,
                Ok(None) => match self.helper.has_exited() {
                    Ok(true) => {
                        info!("helper closed without a detectable target process starting");
                        return SessionOutcome::HelperExited;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        warn!(%err, "helper status query failed, retrying next tick");
                    }
                },
                Err(err) => {
                    warn!(%err, "process scan failed, retrying next tick");
                }
            }

            tokio::select! {
                () = self.cancel.cancelled() => return SessionOutcome::Cancelled,
                () = tokio::time::sleep(self.resolve_poll) => {}
            }
        };

        // ── Attachment: poll the one acquired PID ────────
        self.state_tx.send_replace(SessionState::Attached);
        info!(pid = target_pid, "pinned tracking to target process");

        loop {
            match self.probe.is_running(target_pid) {
                Ok(true) => {}
                Ok(false) => {
                    info!(pid = target_pid, "target process exited");
                    return SessionOutcome::TargetExited;
                }
                Err(err) => {
                    warn!(%err, pid = target_pid, "liveness query failed, retrying next tick");
                }
            }

            tokio::select! {
                () = self.cancel.cancelled() => return SessionOutcome::Cancelled,
                () = tokio::time::sleep(self.attach_poll) => {}
            }
        }
    }

    /// Terminal teardown: release handles, deregister, emit the single
    /// `Stopped` event.
    async fn finish(self, outcome: SessionOutcome) {
        let Self {
            session,
            helper,
            event_tx,
            state_tx,
            registry,
            ..
        } = self;

        state_tx.send_replace(SessionState::Terminated);
        drop(helper);

        if let Some(registry) = registry {
            registry.remove(&session.id).await;
        }

        info!(game_id = session.game_id, ?outcome, "session terminated");

        let stopped = SessionEvent::Stopped {
            session_id: session.id,
            game_id: session.game_id,
            outcome,
        };
        if event_tx.send(stopped).await.is_err() {
            warn!("lifecycle listener dropped before the stop event");
        }
    }
}

/// Caller-facing handle for a running session.
///
/// Dropping the handle does not affect the session; the registry owns the
/// task. Cancellation stops supervision only — the helper and target
/// processes are never killed.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: String,
    game_id: String,
    cancel: CancellationToken,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// The session ID this handle controls.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The namespaced game identifier the session was launched for.
    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Request cancellation. Idempotent; callable at any time, including
    /// after the session has terminated (a no-op then). The supervisor
    /// observes the request within one poll interval.
    pub fn request_cancel(&self) {
        self.cancel.cancel();
    }

    /// Current supervisor state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the session reaches its terminal state.
    pub async fn wait_terminated(&mut self) {
        loop {
            if self.state.borrow_and_update().is_terminal() {
                return;
            }
            if self.state.changed().await.is_err() {
                return;
            }
        }
    }
}
