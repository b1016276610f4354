//! Locked-file accessor with a reentrant RAII critical section.
//!
//! A [`LockedFile`] owns at most one open descriptor for its path. The first
//! [`CriticalSection`] opens the file and takes the exclusive advisory lock;
//! nested sections on the same accessor reuse that descriptor instead of
//! opening a second one, which would block forever against our own lock.
//! When the outermost section drops, the lock is released and the descriptor
//! closed, including on early return, `?` propagation, and unwinding.

use super::types::LockMode;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::cell::{Cell, RefCell};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Accessor for a lock file guarded by an exclusive OS advisory lock.
#[derive(Debug)]
pub struct LockedFile {
    path: PathBuf,

    /// Descriptor shared by all nested sections; `Some` only while `depth > 0`.
    handle: RefCell<Option<File>>,

    /// Number of live critical sections on this accessor.
    depth: Cell<usize>,
}

impl LockedFile {
    /// Create the file if it does not exist yet (contents are left untouched)
    /// and return an accessor for it.
    ///
    /// Parent directories are not created.
    pub fn create<P: Into<PathBuf>>(path: P) -> io::Result<Self> {
        let path = path.into();
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        tracing::debug!(path = %path.display(), "lock file ready");
        Ok(Self::existing(path))
    }

    /// Accessor for a file that is expected to exist already.
    ///
    /// Opening happens lazily when a section is entered, so a missing file
    /// surfaces as a `NotFound` error from [`LockedFile::enter`].
    pub fn existing<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            handle: RefCell::new(None),
            depth: Cell::new(0),
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a critical section is currently open on this accessor.
    pub fn is_held(&self) -> bool {
        self.depth.get() > 0
    }

    /// Enter a critical section, blocking until the OS lock is granted.
    pub fn enter(&self) -> io::Result<CriticalSection<'_>> {
        self.enter_with(LockMode::Blocking)?.ok_or_else(|| {
            io::Error::other(format!(
                "blocking lock on '{}' returned without the lock",
                self.path.display()
            ))
        })
    }

    /// Enter a critical section without waiting.
    ///
    /// Returns `Ok(None)` if another descriptor holds the OS lock.
    pub fn try_enter(&self) -> io::Result<Option<CriticalSection<'_>>> {
        self.enter_with(LockMode::NonBlocking)
    }

    /// Enter a critical section using the given mode.
    pub fn enter_with(&self, mode: LockMode) -> io::Result<Option<CriticalSection<'_>>> {
        if self.is_held() {
            self.with_handle(|file| file.seek(SeekFrom::Start(0)).map(|_| ()))?;
            self.depth.set(self.depth.get() + 1);
            return Ok(Some(CriticalSection { owner: self }));
        }

        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;

        match mode {
            LockMode::Blocking => FileExt::lock_exclusive(&file)?,
            LockMode::NonBlocking => {
                if let Err(e) = FileExt::try_lock_exclusive(&file) {
                    if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                        tracing::debug!(path = %self.path.display(), "advisory lock busy");
                        return Ok(None);
                    }
                    return Err(e);
                }
            }
        }

        *self.handle.borrow_mut() = Some(file);
        self.depth.set(1);
        Ok(Some(CriticalSection { owner: self }))
    }

    /// Run `op` inside a blocking critical section.
    pub fn with_locked<T, E, F>(&self, op: F) -> Result<T, E>
    where
        E: From<io::Error>,
        F: FnOnce(&CriticalSection<'_>) -> Result<T, E>,
    {
        let section = self.enter()?;
        op(&section)
    }

    /// Run `op` inside a critical section entered with `mode`.
    ///
    /// Returns `Ok(None)` without running `op` when a non-blocking attempt
    /// finds the OS lock busy.
    pub fn with_mode<T, E, F>(&self, mode: LockMode, op: F) -> Result<Option<T>, E>
    where
        E: From<io::Error>,
        F: FnOnce(&CriticalSection<'_>) -> Result<T, E>,
    {
        match self.enter_with(mode)? {
            Some(section) => op(&section).map(Some),
            None => Ok(None),
        }
    }

    fn with_handle<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut handle = self.handle.borrow_mut();
        match handle.as_mut() {
            Some(file) => f(file),
            None => Err(io::Error::other(format!(
                "lock file '{}' is not open",
                self.path.display()
            ))),
        }
    }
}

/// Scope in which the accessor's file is open and exclusively locked.
///
/// Every read or write starts from offset zero.
#[derive(Debug)]
pub struct CriticalSection<'a> {
    owner: &'a LockedFile,
}

impl CriticalSection<'_> {
    /// Path of the locked file.
    pub fn path(&self) -> &Path {
        self.owner.path()
    }

    /// Nesting depth of this section (1 for the outermost).
    pub fn depth(&self) -> usize {
        self.owner.depth.get()
    }

    /// Read the whole file. Invalid UTF-8 is replaced rather than rejected.
    pub fn read_to_string(&self) -> io::Result<String> {
        self.owner.with_handle(|file| {
            file.seek(SeekFrom::Start(0))?;
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        })
    }

    /// Replace the file contents with `content` and sync it to disk.
    pub fn overwrite(&self, content: &str) -> io::Result<()> {
        self.owner.with_handle(|file| {
            file.seek(SeekFrom::Start(0))?;
            file.set_len(0)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
    }

    /// Truncate the file to empty.
    pub fn clear(&self) -> io::Result<()> {
        self.owner.with_handle(|file| {
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.sync_all()
        })
    }

    /// Last modification time, if the platform reports one.
    pub fn modified(&self) -> io::Result<Option<DateTime<Utc>>> {
        self.owner.with_handle(|file| {
            let modified = file.metadata()?.modified().ok();
            Ok(modified.map(DateTime::<Utc>::from))
        })
    }
}

impl Drop for CriticalSection<'_> {
    fn drop(&mut self) {
        let depth = self.owner.depth.get() - 1;
        self.owner.depth.set(depth);
        if depth > 0 {
            return;
        }

        if let Some(file) = self.owner.handle.borrow_mut().take()
            && let Err(e) = FileExt::unlock(&file)
        {
            // Closing the descriptor below drops the lock regardless.
            tracing::warn!(
                path = %self.owner.path.display(),
                error = %e,
                "failed to unlock lock file"
            );
        }
    }
}
