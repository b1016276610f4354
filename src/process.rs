//! Process identity and liveness helpers.
//!
//! The lock file stores a bare decimal PID. These helpers parse that content
//! and probe whether the recorded process still exists.

use std::io;

/// Process ID of the calling process.
pub fn current_pid() -> u32 {
    std::process::id()
}

/// Parse lock file content into a PID.
///
/// Leading whitespace and an optional `+` sign are accepted, followed by the
/// leading run of ASCII digits; anything after the digits is ignored. Empty,
/// non-numeric, negative, or out-of-range content parses as `0` (unowned).
pub fn parse_pid(content: &str) -> u32 {
    let trimmed = content.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..digits_end].parse().unwrap_or(0)
}

/// Check whether a process with the given PID currently exists.
///
/// PID `0` is never alive. Every probe failure (no such process, permission
/// denied, or anything else) counts as not alive, which lets a lock whose
/// owner cannot be proven alive be reclaimed.
pub fn is_alive(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }

    match probe(pid) {
        Ok(()) => true,
        Err(e) => {
            tracing::trace!(pid, error = %e, "liveness probe failed, treating process as dead");
            false
        }
    }
}

/// Deliver the null signal to `pid`.
#[cfg(unix)]
fn probe(pid: u32) -> io::Result<()> {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("pid {} is out of range", pid),
        )
    })?;

    kill(Pid::from_raw(raw), None).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn probe(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process liveness probing requires a unix host",
    ))
}
