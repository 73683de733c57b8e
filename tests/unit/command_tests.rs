//! Unit tests for helper command construction.

use std::path::Path;

use flashpoint_launcher::play::command::HelperCommand;
use flashpoint_launcher::AppError;

#[test]
fn builds_play_arguments_from_prefixed_identifier() {
    let command = HelperCommand::build(
        "flashpoint-",
        "flashpoint-42",
        Path::new("/apps/helper/bin/run.exe"),
    )
    .expect("command should build");

    assert_eq!(command.args, vec!["play", "-i", "42"]);
    assert_eq!(command.working_dir, Path::new("/apps/helper/bin"));
    assert_eq!(command.program, Path::new("/apps/helper/bin/run.exe"));
}

#[test]
fn identifier_without_prefix_passes_through() {
    let command = HelperCommand::build(
        "flashpoint-",
        "bare-identifier",
        Path::new("/apps/helper/bin/run.exe"),
    )
    .expect("command should build");

    assert_eq!(command.args, vec!["play", "-i", "bare-identifier"]);
}

#[test]
fn helper_path_without_parent_is_rejected() {
    let result = HelperCommand::build("flashpoint-", "flashpoint-42", Path::new("run.exe"));
    assert!(matches!(result, Err(AppError::Launch(_))));
}

#[test]
fn into_command_carries_args_and_working_dir() {
    let command = HelperCommand::build(
        "flashpoint-",
        "flashpoint-42",
        Path::new("/apps/helper/bin/run.exe"),
    )
    .expect("command should build");

    let tokio_command = command.into_command();
    let std_command = tokio_command.as_std();

    let args: Vec<_> = std_command.get_args().collect();
    assert_eq!(args, ["play", "-i", "42"]);
    assert_eq!(
        std_command.get_current_dir(),
        Some(Path::new("/apps/helper/bin"))
    );
}
