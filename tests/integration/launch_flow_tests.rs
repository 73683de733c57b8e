//! Integration tests for the launch flow with real helper processes.
//!
//! The helper is a throwaway shell script standing in for `CLIFp`; the
//! process probe is scripted so the scenarios do not depend on what else
//! is running on the machine. Spawn-based tests are Unix-only and run
//! serially to keep process handling predictable.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use flashpoint_launcher::play::probe::ProcessProbe;
use flashpoint_launcher::play::{Launcher, SessionEvent, SessionOutcome, SessionRegistry};
use flashpoint_launcher::{AppError, LauncherConfig, Result};

/// Probe replaying a fixed script of scan results.
struct ScriptedProbe {
    finds: VecDeque<Option<u32>>,
    alive: VecDeque<bool>,
}

impl ScriptedProbe {
    fn new(finds: Vec<Option<u32>>, alive: Vec<bool>) -> Self {
        Self {
            finds: finds.into(),
            alive: alive.into(),
        }
    }

    fn never_finds() -> Self {
        Self::new(vec![], vec![])
    }
}

impl ProcessProbe for ScriptedProbe {
    fn find_pid_by_name(&mut self, _name: &str) -> Result<Option<u32>> {
        Ok(self.finds.pop_front().unwrap_or(None))
    }

    fn is_running(&mut self, _pid: u32) -> Result<bool> {
        Ok(self.alive.pop_front().unwrap_or(false))
    }
}

/// Build a config over a temp install with fast polling.
fn test_config(install: &std::path::Path) -> Arc<LauncherConfig> {
    let toml = format!(
        r"
install_directory = '{}'
collection_filename = 'picks.json'

[supervision]
resolve_poll_ms = 10
attach_poll_ms = 10
",
        install.to_str().expect("utf8 path"),
    );
    Arc::new(LauncherConfig::from_toml_str(&toml).expect("valid config"))
}

/// Write an executable helper script at the configured `CLIFp` location.
#[cfg(unix)]
fn install_helper_script(config: &LauncherConfig, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let helper_path = config.helper_path();
    let bin_dir = helper_path.parent().expect("helper parent dir");
    std::fs::create_dir_all(bin_dir).expect("mkdir helper dir");
    std::fs::write(&helper_path, format!("#!/bin/sh\n{body}\n")).expect("write helper");
    std::fs::set_permissions(&helper_path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod helper");
}

async fn next_event(rx: &mut mpsc::Receiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event should arrive before timeout")
        .expect("channel should not be closed")
}

#[tokio::test]
async fn failed_launch_emits_only_stopped() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = test_config(temp.path());
    // No helper script is installed, so process creation must fail.

    let (event_tx, mut events) = mpsc::channel(8);
    let registry = Arc::new(SessionRegistry::new());
    let launcher = Launcher::new(Arc::clone(&config), Arc::clone(&registry), event_tx);

    let result = launcher
        .launch_with_probe("flashpoint-42", ScriptedProbe::never_finds())
        .await;
    assert!(matches!(result, Err(AppError::Launch(_))));

    let event = next_event(&mut events).await;
    assert!(
        matches!(
            event,
            SessionEvent::Stopped {
                outcome: SessionOutcome::LaunchFailed,
                ..
            }
        ),
        "expected Stopped/LaunchFailed, got {event:?}"
    );

    // No Started, no supervisor, no registry entry.
    assert!(events.try_recv().is_err());
    assert_eq!(registry.active_count().await, 0);
}

#[cfg(unix)]
mod unix {
    use super::*;

    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn started_precedes_stopped_when_helper_exits_cleanly() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = test_config(temp.path());
        install_helper_script(&config, "exit 0");

        let (event_tx, mut events) = mpsc::channel(8);
        let registry = Arc::new(SessionRegistry::new());
        let launcher = Launcher::new(Arc::clone(&config), Arc::clone(&registry), event_tx);

        let mut handle = launcher
            .launch_with_probe("flashpoint-42", ScriptedProbe::never_finds())
            .await
            .expect("launch should succeed");

        let first = next_event(&mut events).await;
        assert!(
            matches!(first, SessionEvent::Started { ref game_id, .. } if game_id == "flashpoint-42"),
            "expected Started first, got {first:?}"
        );

        let second = next_event(&mut events).await;
        assert!(
            matches!(
                second,
                SessionEvent::Stopped {
                    outcome: SessionOutcome::HelperExited,
                    ..
                }
            ),
            "expected Stopped/HelperExited, got {second:?}"
        );

        handle.wait_terminated().await;
        assert_eq!(registry.active_count().await, 0);
        assert!(events.try_recv().is_err(), "no further events may follow");
    }

    #[tokio::test]
    #[serial]
    async fn attachment_outlives_the_helper() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = test_config(temp.path());
        install_helper_script(&config, "sleep 0.2");

        let (event_tx, mut events) = mpsc::channel(8);
        let registry = Arc::new(SessionRegistry::new());
        let launcher = Launcher::new(Arc::clone(&config), Arc::clone(&registry), event_tx);

        // Target appears on the second scan while the helper is still
        // running, and stays alive past the helper's own exit at ~200ms.
        let mut alive = vec![true; 25];
        alive.push(false);
        let probe = ScriptedProbe::new(vec![None, Some(777)], alive);
        let mut handle = launcher
            .launch_with_probe("flashpoint-42", probe)
            .await
            .expect("launch should succeed");

        let first = next_event(&mut events).await;
        assert!(matches!(first, SessionEvent::Started { .. }));

        let second = next_event(&mut events).await;
        assert!(
            matches!(
                second,
                SessionEvent::Stopped {
                    outcome: SessionOutcome::TargetExited,
                    ..
                }
            ),
            "expected Stopped/TargetExited, got {second:?}"
        );

        handle.wait_terminated().await;
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    #[serial]
    async fn cancel_during_resolution_stops_the_session() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = test_config(temp.path());
        install_helper_script(&config, "sleep 2");

        let (event_tx, mut events) = mpsc::channel(8);
        let registry = Arc::new(SessionRegistry::new());
        let launcher = Launcher::new(Arc::clone(&config), Arc::clone(&registry), event_tx);

        let mut handle = launcher
            .launch_with_probe("flashpoint-42", ScriptedProbe::never_finds())
            .await
            .expect("launch should succeed");

        let first = next_event(&mut events).await;
        assert!(matches!(first, SessionEvent::Started { .. }));

        handle.request_cancel();
        let second = next_event(&mut events).await;
        assert!(
            matches!(
                second,
                SessionEvent::Stopped {
                    outcome: SessionOutcome::Cancelled,
                    ..
                }
            ),
            "expected Stopped/Cancelled, got {second:?}"
        );

        handle.wait_terminated().await;
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    #[serial]
    async fn shutdown_all_cancels_running_sessions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = test_config(temp.path());
        install_helper_script(&config, "sleep 2");

        let (event_tx, mut events) = mpsc::channel(8);
        let registry = Arc::new(SessionRegistry::new());
        let launcher = Launcher::new(Arc::clone(&config), Arc::clone(&registry), event_tx);

        let _handle = launcher
            .launch_with_probe("flashpoint-42", ScriptedProbe::never_finds())
            .await
            .expect("launch should succeed");

        let first = next_event(&mut events).await;
        assert!(matches!(first, SessionEvent::Started { .. }));

        registry.shutdown_all().await;

        let second = next_event(&mut events).await;
        assert!(
            matches!(
                second,
                SessionEvent::Stopped {
                    outcome: SessionOutcome::Cancelled,
                    ..
                }
            ),
            "expected Stopped/Cancelled after shutdown, got {second:?}"
        );
        assert_eq!(registry.active_count().await, 0);
    }
}
