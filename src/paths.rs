//! Lock path conventions.
//!
//! Callers may name a lock by path (`/var/run/app.pid`, `./app.pid`) or by a
//! bare name (`worker`). Paths are used as given; bare names are placed in a
//! pids directory with a default extension. Resolution is a pure function of
//! its inputs and never touches the filesystem.

use crate::error::{ProcLockError, Result};
use std::path::{Path, PathBuf};

/// Default pids directory relative to an application root.
pub const DEFAULT_PIDS_DIR: &str = "tmp/pids";

/// Default extension appended to bare lock names.
pub const DEFAULT_EXTENSION: &str = "pid";

/// Maps lock names to lock file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidPathResolver {
    /// Directory holding lock files for bare names.
    pub pids_dir: PathBuf,

    /// Extension (without leading dot) appended to bare names that lack one.
    pub default_extension: String,
}

impl PidPathResolver {
    /// Create a resolver with an explicit directory and extension.
    pub fn new<P: Into<PathBuf>>(pids_dir: P, default_extension: &str) -> Self {
        Self {
            pids_dir: pids_dir.into(),
            default_extension: default_extension.trim_start_matches('.').to_string(),
        }
    }

    /// The conventional layout under an application root: `{root}/tmp/pids/*.pid`.
    pub fn for_root<P: AsRef<Path>>(root: P) -> Self {
        Self::new(root.as_ref().join(DEFAULT_PIDS_DIR), DEFAULT_EXTENSION)
    }

    /// Resolve a lock name or path to the lock file path.
    ///
    /// Absolute paths and anything containing a path separator are returned
    /// verbatim. A bare name is joined onto `pids_dir`, gaining
    /// `.default_extension` if it has no extension of its own.
    ///
    /// Empty names and `.`/`..` are rejected: they would name the pids
    /// directory itself or something outside it.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if is_explicit_path(name) {
            return Ok(PathBuf::from(name));
        }

        if matches!(name.trim(), "" | "." | "..") {
            return Err(ProcLockError::UserError(format!(
                "invalid lock name '{}'\nFix: pass a file name such as 'worker' or a path such as './worker.pid'.",
                name
            )));
        }

        let mut path = self.pids_dir.join(name);
        if path.extension().is_none() && !self.default_extension.is_empty() {
            path.set_extension(&self.default_extension);
        }
        Ok(path)
    }
}

fn is_explicit_path(name: &str) -> bool {
    let path = Path::new(name);
    path.is_absolute() || path.components().count() > 1 || name.contains('/')
}
