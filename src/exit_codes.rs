//! Exit code constants for the proclock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: I/O failure (open/flock/read/write)
//! - 3: Release attempted by a process that does not own the lock
//! - 4: Lock is held by another live process
//! - 5: Command run under the lock exited unsuccessfully

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Filesystem failure while operating on the lock file.
pub const IO_FAILURE: i32 = 2;

/// Release failed because the caller does not own the lock.
pub const NOT_LOCKED: i32 = 3;

/// Lock acquisition failure: another live process owns the lock.
pub const LOCK_FAILURE: i32 = 4;

/// The command run under the lock failed or could not report a status.
pub const COMMAND_FAILURE: i32 = 5;
