//! Config struct definition and default implementation.

use crate::locks::LockMode;
use crate::paths::DEFAULT_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config file looked up in the root directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "proclock.yaml";

/// Configuration for lock path resolution and acquisition.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Path settings
    // =========================================================================
    /// Directory for lock files named by a bare name.
    ///
    /// Relative values are resolved against the root directory. When unset,
    /// `{root}/tmp/pids` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pids_dir: Option<PathBuf>,

    /// Extension (no leading dot) appended to bare lock names.
    #[serde(default = "default_extension")]
    pub default_extension: String,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Whether acquisition waits for the OS lock or gives up immediately.
    #[serde(default)]
    pub lock_mode: LockMode,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pids_dir: None,
            default_extension: default_extension(),
            lock_mode: LockMode::default(),
        }
    }
}
