//! `status` and `read` commands.

use super::CommandContext;
use crate::cli::{LockArgs, StatusArgs};
use crate::error::{ProcLockError, Result};
use crate::locks::LockStatus;

pub(super) fn cmd_status(ctx: &CommandContext, args: StatusArgs) -> Result<()> {
    let lock = ctx.open_lock(&args.lock, false)?;
    let status = lock.status()?;

    if args.json {
        let json = serde_json::to_string_pretty(&status).map_err(|e| {
            ProcLockError::UserError(format!("failed to serialize lock status: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", render_status(&status));
    }

    Ok(())
}

pub(super) fn cmd_read(ctx: &CommandContext, args: LockArgs) -> Result<()> {
    let lock = ctx.open_lock(&args.lock, false)?;
    println!("{}", lock.read()?);
    Ok(())
}

fn render_status(status: &LockStatus) -> String {
    let mut out = format!("Lock:       {}\n", status.path.display());
    out.push_str(&format!("State:      {}\n", status.occupant.as_str()));
    if status.pid > 0 {
        out.push_str(&format!("PID:        {}\n", status.pid));
        out.push_str(&format!(
            "Alive:      {}\n",
            if status.alive { "yes" } else { "no (stale)" }
        ));
    }
    if let Some(modified) = status.modified_at {
        out.push_str(&format!(
            "Modified:   {}\n",
            modified.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out
}
