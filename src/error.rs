//! Error types for proclock.
//!
//! Expected contention (held by a live process, released by a non-owner) has
//! dedicated variants. Filesystem failures are carried through untouched as
//! [`ProcLockError::Io`].

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for proclock operations.
#[derive(Error, Debug)]
pub enum ProcLockError {
    /// The lock is owned by another live process.
    ///
    /// `pid` is `None` when a non-blocking attempt found the OS lock busy and
    /// never got to read the owner.
    #[error("lock '{}' is held by {}", .path.display(), describe_holder(.pid))]
    AlreadyLocked { path: PathBuf, pid: Option<u32> },

    /// Release was requested by a process that does not own the lock.
    #[error("lock '{}' is not held by this process", .path.display())]
    NotLocked { path: PathBuf },

    /// Open, flock, read or write failure on the lock file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration could not be read or failed validation.
    #[error("{0}")]
    Config(String),

    /// User provided invalid arguments.
    #[error("{0}")]
    UserError(String),

    /// A command run under the lock exited unsuccessfully.
    #[error("command '{command}' exited with status {code}")]
    CommandFailed { command: String, code: i32 },
}

fn describe_holder(pid: &Option<u32>) -> String {
    match pid {
        Some(pid) => format!("process {}", pid),
        None => "another process".to_string(),
    }
}

impl ProcLockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcLockError::AlreadyLocked { .. } => exit_codes::LOCK_FAILURE,
            ProcLockError::NotLocked { .. } => exit_codes::NOT_LOCKED,
            ProcLockError::Io(_) => exit_codes::IO_FAILURE,
            ProcLockError::Config(_) => exit_codes::USER_ERROR,
            ProcLockError::UserError(_) => exit_codes::USER_ERROR,
            ProcLockError::CommandFailed { .. } => exit_codes::COMMAND_FAILURE,
        }
    }
}

/// Result type alias for proclock operations.
pub type Result<T> = std::result::Result<T, ProcLockError>;
