//! Locking subsystem for proclock.
//!
//! # Lock Files
//!
//! A lock file holds either nothing or the decimal PID of the process that
//! owns the lock. Ownership is defined by the file contents alone; there is
//! no in-memory state shared between processes.
//!
//! # Critical Sections
//!
//! Reads and writes of the PID happen while holding an exclusive OS advisory
//! lock on the file (`flock` on unix), taken through [`LockedFile`]. The
//! advisory lock is held only for the read-classify-write step; logical
//! ownership outlives it and is recorded in the file.
//!
//! # Stale Locks
//!
//! A stored PID whose process no longer exists is treated as abandoned and
//! may be overwritten by the next acquirer. Release truncates the file to
//! empty; the file itself is never deleted.

mod guard;
mod process_lock;
mod types;


// Re-export public API
pub use guard::{CriticalSection, LockedFile};
pub use process_lock::ProcessLock;
pub use types::{LockMode, LockStatus, Occupant};
