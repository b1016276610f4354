//! Lock state classification and status snapshots.

use crate::process;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Who the lock file says owns the lock, as observed inside the critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "pid", rename_all = "snake_case")]
pub enum Occupant {
    /// Empty file or PID `0`.
    Unowned,
    /// The calling process.
    Current,
    /// Another process that is still running.
    Alive(u32),
    /// Another process that no longer exists (a stale lock).
    Abandoned(u32),
}

impl Occupant {
    /// Classify a stored PID relative to the calling process.
    ///
    /// Only a foreign PID is probed for liveness.
    pub fn classify(pid: u32) -> Self {
        if pid == 0 {
            Occupant::Unowned
        } else if pid == process::current_pid() {
            Occupant::Current
        } else if process::is_alive(pid) {
            Occupant::Alive(pid)
        } else {
            Occupant::Abandoned(pid)
        }
    }

    /// Whether the calling process may write its own PID over this occupant.
    pub fn is_claimable(&self) -> bool {
        !matches!(self, Occupant::Alive(_))
    }

    /// The recorded PID, or `None` when unowned.
    pub fn pid(&self) -> Option<u32> {
        match self {
            Occupant::Unowned => None,
            Occupant::Current => Some(process::current_pid()),
            Occupant::Alive(pid) | Occupant::Abandoned(pid) => Some(*pid),
        }
    }

    /// Short label used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupant::Unowned => "unowned",
            Occupant::Current => "current",
            Occupant::Alive(_) => "alive",
            Occupant::Abandoned(_) => "abandoned",
        }
    }
}

/// How the acquire family waits for the OS advisory lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Block until the OS lock is granted.
    #[default]
    Blocking,
    /// Give up immediately if another descriptor holds the OS lock.
    NonBlocking,
}

/// Point-in-time view of a lock file.
#[derive(Debug, Clone, Serialize)]
pub struct LockStatus {
    /// The lock file path.
    pub path: PathBuf,

    /// Stored PID (`0` when unowned).
    pub pid: u32,

    /// Classification of the stored PID.
    pub occupant: Occupant,

    /// Whether the calling process owns the lock.
    pub owner: bool,

    /// Whether the stored PID belongs to a running process.
    pub alive: bool,

    /// Last modification time of the lock file, when the platform reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}", self.path.display(), self.occupant.as_str())?;
        if self.pid > 0 {
            write!(f, ", pid: {}", self.pid)?;
        }
        write!(f, ")")
    }
}
