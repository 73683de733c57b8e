//! Process discovery and liveness probing.
//!
//! Target identification is a best-effort heuristic: the supervisor looks
//! for any process whose executable name matches the expected target name,
//! with no parent-child or creation-notification link. The heuristic lives
//! behind the [`ProcessProbe`] trait so a stronger OS-specific mechanism
//! can be substituted without changing the supervisor's state machine.

use std::ffi::OsStr;
use std::path::Path;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::Result;

/// Pluggable process matching and liveness strategy.
pub trait ProcessProbe: Send {
    /// Scan all running processes for one whose executable name (without
    /// extension) matches, returning the lowest matching PID.
    ///
    /// # Errors
    ///
    /// Implementations may fail on transient OS query errors; the
    /// supervisor treats a failure as "no match this tick".
    fn find_pid_by_name(&mut self, name: &str) -> Result<Option<u32>>;

    /// Check whether one specific PID is still running, without global
    /// enumeration.
    ///
    /// # Errors
    ///
    /// Implementations may fail on transient OS query errors; the
    /// supervisor treats a failure as "still alive this tick". A PID that
    /// is reported gone is the process-exited signal.
    fn is_running(&mut self, pid: u32) -> Result<bool>;
}

/// Exit detection on the helper process itself.
///
/// Separate from [`ProcessProbe`] because the helper is our own child and
/// can be polled through its OS handle directly.
pub trait HelperHandle: Send {
    /// Whether the helper process has exited.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the status query fails; the
    /// supervisor treats a failure as "not exited this tick".
    fn has_exited(&mut self) -> std::io::Result<bool>;

    /// OS process identifier of the helper, if still available.
    fn pid(&self) -> Option<u32>;
}

impl HelperHandle for tokio::process::Child {
    fn has_exited(&mut self) -> std::io::Result<bool> {
        self.try_wait().map(|status| status.is_some())
    }

    fn pid(&self) -> Option<u32> {
        self.id()
    }
}

/// Production probe backed by `sysinfo`.
pub struct SystemProbe {
    system: System,
}

impl SystemProbe {
    /// Create a probe with an empty process snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SystemProbe {
    fn find_pid_by_name(&mut self, name: &str) -> Result<Option<u32>> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        let found = self
            .system
            .processes()
            .iter()
            .filter(|(_, process)| stem_matches(process.name(), name))
            .map(|(pid, _)| pid.as_u32())
            .min();

        Ok(found)
    }

    fn is_running(&mut self, pid: u32) -> Result<bool> {
        let target = Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[target]),
            true,
            ProcessRefreshKind::nothing(),
        );
        Ok(self.system.process(target).is_some())
    }
}

/// Compare a process name against a target executable name, ignoring any
/// extension and ASCII case (Windows reports names with `.exe`).
fn stem_matches(process_name: &OsStr, target: &str) -> bool {
    let name = process_name.to_string_lossy();
    let stem = Path::new(name.as_ref())
        .file_stem()
        .map_or_else(|| name.to_string(), |stem| stem.to_string_lossy().into_owned());
    stem.eq_ignore_ascii_case(target)
}
