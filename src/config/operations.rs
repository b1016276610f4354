//! Config loading, validation, and resolver construction.

use super::model::Config;
use crate::error::{ProcLockError, Result};
use crate::paths::PidPathResolver;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ProcLockError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ProcLockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ProcLockError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ProcLockError::Config(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `default_extension` must be non-empty and have no leading dot
    /// - `pids_dir`, when set, must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.default_extension.is_empty() {
            return Err(ProcLockError::Config(
                "config validation failed: default_extension must be non-empty".to_string(),
            ));
        }

        if self.default_extension.starts_with('.') {
            return Err(ProcLockError::Config(format!(
                "config validation failed: default_extension must not have a leading dot (found '{}'). Use '{}' instead.",
                self.default_extension,
                self.default_extension.trim_start_matches('.')
            )));
        }

        if let Some(dir) = &self.pids_dir
            && dir.as_os_str().is_empty()
        {
            return Err(ProcLockError::Config(
                "config validation failed: pids_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the path resolver for locks under `root`.
    pub fn resolver<P: AsRef<Path>>(&self, root: P) -> PidPathResolver {
        let root = root.as_ref();
        let mut resolver = PidPathResolver::for_root(root);
        if let Some(dir) = &self.pids_dir {
            resolver.pids_dir = root.join(dir);
        }
        resolver.default_extension = self.default_extension.clone();
        resolver
    }
}
