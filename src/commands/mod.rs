//! Command implementations for proclock.
//!
//! This module resolves the lock named on the command line (root directory,
//! config file, path convention) and routes each command to its handler.

mod run;
mod status;

use crate::cli::{Cli, Command};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{ProcLockError, Result};
use crate::locks::{LockMode, ProcessLock};
use crate::paths::PidPathResolver;
use std::env;
use std::path::PathBuf;

/// Resolved settings shared by all commands.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Root directory for bare lock names.
    pub root: PathBuf,

    /// Loaded (or default) configuration.
    pub config: Config,

    /// Resolver built from `root` and `config`.
    pub resolver: PidPathResolver,
}

impl CommandContext {
    /// Resolve the root directory and load the config.
    ///
    /// An explicit `--config` must exist; the default `{root}/proclock.yaml`
    /// is optional.
    pub fn resolve(root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => env::current_dir().map_err(|e| {
                ProcLockError::UserError(format!(
                    "failed to get current working directory: {}",
                    e
                ))
            })?,
        };

        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(root.join(DEFAULT_CONFIG_FILE))?,
        };

        let resolver = config.resolver(&root);
        Ok(Self {
            root,
            config,
            resolver,
        })
    }

    /// Bind a lock for `name`, using the configured mode unless `no_wait`
    /// forces non-blocking acquisition.
    pub fn open_lock(&self, name: &str, no_wait: bool) -> Result<ProcessLock> {
        let path = self.resolver.resolve(name)?;
        let mode = if no_wait {
            LockMode::NonBlocking
        } else {
            self.config.lock_mode
        };

        tracing::debug!(lock = name, path = %path.display(), ?mode, "opening lock");
        Ok(ProcessLock::new(path)?.with_mode(mode))
    }
}

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = CommandContext::resolve(cli.root, cli.config)?;

    match cli.command {
        Command::Status(args) => status::cmd_status(&ctx, args),
        Command::Read(args) => status::cmd_read(&ctx, args),
        Command::Acquire(args) => run::cmd_acquire(&ctx, args),
        Command::Run(args) => run::cmd_run(&ctx, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_without_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let ctx = CommandContext::resolve(Some(temp_dir.path().to_path_buf()), None).unwrap();

        assert_eq!(ctx.config, Config::default());
        assert_eq!(
            ctx.resolver.resolve("db").unwrap(),
            temp_dir.path().join("tmp/pids/db.pid")
        );
    }

    #[test]
    fn resolve_reads_default_config_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "pids_dir: locks\nlock_mode: non_blocking\n",
        )
        .unwrap();

        let ctx = CommandContext::resolve(Some(temp_dir.path().to_path_buf()), None).unwrap();

        assert_eq!(ctx.config.lock_mode, LockMode::NonBlocking);
        assert_eq!(
            ctx.resolver.resolve("db").unwrap(),
            temp_dir.path().join("locks/db.pid")
        );
    }

    #[test]
    fn resolve_fails_for_missing_explicit_config() {
        let temp_dir = TempDir::new().unwrap();

        let err = CommandContext::resolve(
            Some(temp_dir.path().to_path_buf()),
            Some(temp_dir.path().join("nope.yaml")),
        )
        .unwrap_err();

        assert!(matches!(err, ProcLockError::Config(_)));
    }

    #[test]
    fn open_lock_creates_file_and_applies_mode() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("tmp/pids")).unwrap();
        let ctx = CommandContext::resolve(Some(temp_dir.path().to_path_buf()), None).unwrap();

        let lock = ctx.open_lock("db", false).unwrap();
        assert_eq!(lock.mode(), LockMode::Blocking);
        assert!(lock.filename().exists());

        let lock = ctx.open_lock("db", true).unwrap();
        assert_eq!(lock.mode(), LockMode::NonBlocking);
    }

    #[test]
    fn open_lock_rejects_names_outside_pids_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("tmp/pids")).unwrap();
        let ctx = CommandContext::resolve(Some(temp_dir.path().to_path_buf()), None).unwrap();

        for name in ["", ".", ".."] {
            let err = ctx.open_lock(name, false).unwrap_err();
            assert!(matches!(err, ProcLockError::UserError(_)));
        }
        assert!(!temp_dir.path().join("tmp/pids.pid").exists());
    }

    #[test]
    fn open_lock_requires_pids_directory() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = CommandContext::resolve(Some(temp_dir.path().to_path_buf()), None).unwrap();

        let err = ctx.open_lock("db", false).unwrap_err();
        assert!(matches!(err, ProcLockError::Io(_)));
    }
}
