//! Small stand-alone helpers used across the rest of stax.
use crate::Result;
use std::process::{Command, Stdio};

/// Run an external program in the background, discarding its output.
///
/// `cmd` is split on whitespace to obtain the program name and its arguments: use
/// [spawn_with_args] if any of your arguments themselves contain spaces.
pub fn spawn(cmd: impl AsRef<str>) -> Result<()> {
    let cmd = cmd.as_ref();
    let mut parts = cmd.split_whitespace();
    let program = match parts.next() {
        Some(p) => p,
        None => return Ok(()),
    };

    spawn_with_args(program, &parts.collect::<Vec<_>>())
}

/// Run an external program with explicit arguments in the background, discarding its output.
pub fn spawn_with_args(cmd: impl AsRef<str>, args: &[&str]) -> Result<()> {
    Command::new(cmd.as_ref())
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(())
}
