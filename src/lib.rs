//! proclock: cross-process mutual exclusion backed by a PID lock file.
//!
//! A lock file holds the PID of the process that owns it, or nothing. Each
//! read-check-write of that PID runs under an exclusive OS advisory lock, and
//! a PID whose process has died is treated as abandoned so the lock can be
//! reclaimed without the crashed owner cleaning up.
//!
//! ```no_run
//! use proclock::ProcessLock;
//!
//! let lock = ProcessLock::new("/tmp/worker.pid")?;
//! if let Some(report) = lock.try_run_exclusive(|| "did the work")? {
//!     println!("{}", report);
//! } else {
//!     println!("another process is working");
//! }
//! # Ok::<(), proclock::ProcLockError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod locks;
pub mod logging;
pub mod paths;
pub mod process;

#[cfg(test)]
mod test_support;

pub use error::{ProcLockError, Result};
pub use locks::{CriticalSection, LockMode, LockStatus, LockedFile, Occupant, ProcessLock};
pub use paths::PidPathResolver;
