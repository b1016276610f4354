//! The PID-file lock protocol.
//!
//! Every decision is made inside a critical section of the lock file: read
//! the stored PID, classify it, write at most once, unlock.
//!
//! | Stored PID       | acquire                 | release           |
//! |------------------|-------------------------|-------------------|
//! | empty / `0`      | claim                   | not owner         |
//! | own PID          | rewrite own PID         | truncate to empty |
//! | other, alive     | refused, file untouched | not owner         |
//! | other, dead      | claim (overwrite)       | not owner         |

use super::guard::LockedFile;
use super::types::{LockMode, LockStatus, Occupant};
use crate::error::{ProcLockError, Result};
use crate::process;
use std::path::{Path, PathBuf};

/// Cross-process lock recorded as a PID in a lock file.
///
/// A `ProcessLock` is not `Sync`. Two handles on the same path inside one
/// process do not share their critical section, so a blocking acquire issued
/// from both at once can deadlock; use a single handle per process.
#[derive(Debug)]
pub struct ProcessLock {
    file: LockedFile,
    mode: LockMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClaimOutcome {
    /// Our PID is now stored; carries what was there before.
    Claimed(Occupant),
    /// Someone else holds the lock (`None` if the OS lock was busy).
    Refused(Option<u32>),
}

impl ProcessLock {
    /// Bind a lock to `path`, creating an empty lock file if none exists.
    ///
    /// Does not acquire. Fails if the parent directory is missing or not
    /// writable.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Ok(Self::from_locked_file(LockedFile::create(path)?))
    }

    /// Build a lock on top of an existing accessor.
    pub fn from_locked_file(file: LockedFile) -> Self {
        Self {
            file,
            mode: LockMode::default(),
        }
    }

    /// Set how the acquire family waits for the OS lock.
    pub fn with_mode(mut self, mode: LockMode) -> Self {
        self.mode = mode;
        self
    }

    /// The configured acquire mode.
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Path of the lock file.
    pub fn filename(&self) -> &Path {
        self.file.path()
    }

    /// Read the stored PID (`0` when empty or unparseable).
    pub fn read(&self) -> Result<u32> {
        self.file.with_locked(|section| {
            let content = section.read_to_string()?;
            Ok(process::parse_pid(&content))
        })
    }

    /// Classify the stored PID.
    pub fn occupant(&self) -> Result<Occupant> {
        Ok(Occupant::classify(self.read()?))
    }

    /// Whether the calling process owns the lock.
    pub fn is_owner(&self) -> Result<bool> {
        let pid = self.read()?;
        Ok(pid > 0 && pid == process::current_pid())
    }

    /// Whether the stored PID belongs to a running process.
    pub fn is_alive(&self) -> Result<bool> {
        Ok(process::is_alive(self.read()?))
    }

    /// Snapshot of the lock taken in a single critical section.
    pub fn status(&self) -> Result<LockStatus> {
        self.file.with_locked(|section| {
            let pid = self.read()?;
            let occupant = Occupant::classify(pid);
            Ok(LockStatus {
                path: self.filename().to_path_buf(),
                pid,
                occupant,
                owner: occupant == Occupant::Current,
                alive: process::is_alive(pid),
                modified_at: section.modified()?,
            })
        })
    }

    /// Try to take ownership.
    ///
    /// Returns `false`, leaving the file untouched, when another live process
    /// owns the lock. Re-acquiring a lock we already own succeeds.
    pub fn try_acquire(&self) -> Result<bool> {
        Ok(matches!(self.claim()?, ClaimOutcome::Claimed(_)))
    }

    /// Take ownership or fail with [`ProcLockError::AlreadyLocked`].
    pub fn acquire(&self) -> Result<()> {
        match self.claim()? {
            ClaimOutcome::Claimed(_) => Ok(()),
            ClaimOutcome::Refused(pid) => Err(ProcLockError::AlreadyLocked {
                path: self.filename().to_path_buf(),
                pid,
            }),
        }
    }

    /// Run `work` while owning the lock, then release.
    ///
    /// Returns `None` without calling `work` if the lock could not be
    /// acquired. The release happens however `work` exits; a fallible `work`
    /// can return a `Result`, which is passed back as-is.
    pub fn try_run_exclusive<T, F>(&self, work: F) -> Result<Option<T>>
    where
        F: FnOnce() -> T,
    {
        if !self.try_acquire()? {
            return Ok(None);
        }
        self.run_owned(work).map(Some)
    }

    /// Like [`ProcessLock::try_run_exclusive`], but fails with
    /// [`ProcLockError::AlreadyLocked`] when the lock is held elsewhere.
    pub fn run_exclusive<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.acquire()?;
        self.run_owned(work)
    }

    /// Give up ownership by truncating the lock file.
    ///
    /// Returns `false`, leaving the file untouched, unless the calling
    /// process is the owner.
    pub fn try_release(&self) -> Result<bool> {
        self.file.with_locked(|section| {
            if !self.is_owner()? {
                tracing::debug!(path = %self.filename().display(), "release refused: not owner");
                return Ok(false);
            }

            section.clear()?;
            tracing::debug!(path = %self.filename().display(), "released");
            Ok(true)
        })
    }

    /// Give up ownership or fail with [`ProcLockError::NotLocked`].
    pub fn release(&self) -> Result<()> {
        if self.try_release()? {
            Ok(())
        } else {
            Err(ProcLockError::NotLocked {
                path: self.filename().to_path_buf(),
            })
        }
    }

    fn claim(&self) -> Result<ClaimOutcome> {
        let outcome = self.file.with_mode(self.mode, |section| {
            let occupant = self.occupant()?;
            if !occupant.is_claimable() {
                return Ok::<_, ProcLockError>(ClaimOutcome::Refused(occupant.pid()));
            }

            section.overwrite(&process::current_pid().to_string())?;
            Ok(ClaimOutcome::Claimed(occupant))
        })?;

        let outcome = outcome.unwrap_or(ClaimOutcome::Refused(None));
        match outcome {
            ClaimOutcome::Claimed(Occupant::Abandoned(stale)) => tracing::info!(
                path = %self.filename().display(),
                stale_pid = stale,
                "reclaimed lock from dead process"
            ),
            ClaimOutcome::Claimed(previous) => tracing::debug!(
                path = %self.filename().display(),
                previous = previous.as_str(),
                "acquired"
            ),
            ClaimOutcome::Refused(pid) => tracing::debug!(
                path = %self.filename().display(),
                holder = ?pid,
                "acquire refused"
            ),
        }
        Ok(outcome)
    }

    fn run_owned<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        let guard = ReleaseOnDrop {
            lock: self,
            finished: false,
        };
        let output = work();
        guard.finish()?;
        Ok(output)
    }
}

/// Releases the lock if the unit of work unwinds.
struct ReleaseOnDrop<'a> {
    lock: &'a ProcessLock,
    finished: bool,
}

impl ReleaseOnDrop<'_> {
    fn finish(mut self) -> Result<()> {
        self.finished = true;
        if !self.lock.try_release()? {
            // The work released (or handed off) the lock itself.
            tracing::debug!(path = %self.lock.filename().display(), "lock already released by work");
        }
        Ok(())
    }
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if !self.finished
            && let Err(e) = self.lock.try_release()
        {
            tracing::warn!(
                path = %self.lock.filename().display(),
                error = %e,
                "failed to release lock after unit of work"
            );
        }
    }
}
