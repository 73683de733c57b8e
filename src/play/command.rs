//! Helper command-line construction.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::{AppError, Result};

/// The helper invocation for one launch: program, arguments, and working
/// directory, kept as plain data so construction is testable apart from
/// process creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCommand {
    /// Helper executable path.
    pub program: PathBuf,
    /// Arguments passed to the helper.
    pub args: Vec<String>,
    /// Working directory; the helper resolves relative resources from here.
    pub working_dir: PathBuf,
}

impl HelperCommand {
    /// Build the helper invocation for a game identifier.
    ///
    /// Strips the namespacing prefix from the identifier and passes the
    /// remainder as a "play by identifier" argument. The working directory
    /// is the helper executable's own directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Launch` if the helper path has no parent
    /// directory.
    pub fn build(prefix: &str, game_id: &str, helper_path: &Path) -> Result<Self> {
        let stripped = game_id.strip_prefix(prefix).unwrap_or(game_id);
        let working_dir = helper_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| {
                AppError::Launch(format!(
                    "helper path has no parent directory: {}",
                    helper_path.display()
                ))
            })?
            .to_path_buf();

        Ok(Self {
            program: helper_path.to_path_buf(),
            args: vec!["play".into(), "-i".into(), stripped.into()],
            working_dir,
        })
    }

    /// Convert into a spawnable `tokio::process::Command`.
    ///
    /// Stdio is detached and no console window is created; the helper is
    /// never killed when its handle is dropped, since cancellation stops
    /// supervision only.
    #[must_use]
    pub fn into_command(self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command
    }
}
