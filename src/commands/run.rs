//! `acquire` and `run` commands.

use super::CommandContext;
use crate::cli::{AcquireArgs, RunArgs};
use crate::error::{ProcLockError, Result};
use std::process::{Command, ExitStatus};

pub(super) fn cmd_acquire(ctx: &CommandContext, args: AcquireArgs) -> Result<()> {
    let lock = ctx.open_lock(&args.lock, args.no_wait)?;
    lock.acquire()?;
    println!("{}", lock.filename().display());
    Ok(())
}

pub(super) fn cmd_run(ctx: &CommandContext, args: RunArgs) -> Result<()> {
    let argv = parse_command(&args.command)?;
    let lock = ctx.open_lock(&args.lock, args.no_wait)?;

    let status = lock.run_exclusive(|| {
        tracing::debug!(command = %args.command, "running under lock");
        Command::new(&argv[0]).args(&argv[1..]).status()
    })?;

    let status = status.map_err(|e| {
        ProcLockError::UserError(format!(
            "failed to execute command: {}\nCommand: {}\nFix: ensure the command is installed and in PATH.",
            e, args.command
        ))
    })?;

    check_status(&args.command, status)
}

/// Split a command line with shell quoting rules.
fn parse_command(command: &str) -> Result<Vec<String>> {
    let argv = shell_words::split(command).map_err(|e| {
        ProcLockError::UserError(format!(
            "failed to parse command: {}\nCommand: {}\nFix: check for unmatched quotes or invalid escape sequences.",
            e, command
        ))
    })?;

    if argv.is_empty() {
        return Err(ProcLockError::UserError("command is empty".to_string()));
    }

    Ok(argv)
}

fn check_status(command: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    // Killed by a signal: no exit code.
    let code = status.code().unwrap_or(-1);
    Err(ProcLockError::CommandFailed {
        command: command.to_string(),
        code,
    })
}
