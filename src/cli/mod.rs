//! CLI argument parsing for proclock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// proclock: cross-process locks recorded as a PID in a lock file.
///
/// A lock is named by a path (`./app.pid`, `/var/run/app.pid`) or by a bare
/// name, which resolves to `{root}/tmp/pids/{name}.pid` unless configured
/// otherwise.
#[derive(Parser, Debug)]
#[command(name = "proclock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Root directory for bare lock names and the default config file.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file (default: {root}/proclock.yaml, if present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for proclock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show who holds a lock.
    ///
    /// Reports the stored PID, whether that process is alive, and when the
    /// lock file was last written.
    Status(StatusArgs),

    /// Print the stored PID (0 when unowned).
    Read(LockArgs),

    /// Acquire a lock for this process and exit.
    ///
    /// The PID left behind belongs to an exited process, so any later
    /// acquirer may reclaim it. Fails with exit code 4 while another live
    /// process holds the lock.
    Acquire(AcquireArgs),

    /// Run a command while holding a lock.
    ///
    /// The lock is released when the command exits; a failing command makes
    /// proclock exit with code 5.
    Run(RunArgs),
}

/// Arguments naming a single lock.
#[derive(Parser, Debug)]
pub struct LockArgs {
    /// Lock name or path.
    pub lock: String,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Lock name or path.
    pub lock: String,

    /// Print the status as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `acquire` command.
#[derive(Parser, Debug)]
pub struct AcquireArgs {
    /// Lock name or path.
    pub lock: String,

    /// Fail immediately if another process is mid-operation on the lock file.
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Lock name or path.
    pub lock: String,

    /// Command line to run, split with shell quoting rules (e.g. "sleep 5").
    pub command: String,

    /// Fail immediately if another process is mid-operation on the lock file.
    #[arg(long)]
    pub no_wait: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
