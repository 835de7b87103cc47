//! Runs the assembled salt command with inherited stdio.

use std::process::{Command, Stdio};

use tracing::info;

use csalt_core::Invocation;

use crate::error::CliError;

/// Run `invocation` in the foreground. With `debug` the command line is
/// echoed to stderr first.
pub fn run(invocation: &Invocation, debug: bool) -> Result<(), CliError> {
    let line = invocation.command_line();
    if debug {
        eprintln!("{line}");
    }
    info!(command = %line, "running salt");

    let status = Command::new(&invocation.elevate)
        .args(invocation.elevated_args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| CliError::Launch {
            program: invocation.elevate.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::ToolFailed {
            command: line,
            code: status.code(),
        })
    }
}
