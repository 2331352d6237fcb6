//! Unified path management for savvy configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/savvy/             # Config directory (platform config dir + "savvy")
//! ├── config.toml              # Resolver, Gemini, catalog and chat settings
//! ├── secret.json              # Client-held API key
//! └── session.json             # Session flag ({"email": ...})
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR: &str = "savvy";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find the platform config directory")]
    ConfigDirNotFound,
}

/// Resolves every file the application reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavvyPaths {
    root: PathBuf,
}

impl SavvyPaths {
    /// Uses `base` as the config directory, or the platform default when `None`.
    pub fn new(base: Option<&Path>) -> Result<Self, PathError> {
        let root = match base {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(APP_DIR),
        };
        Ok(Self { root })
    }

    /// Returns the savvy configuration directory.
    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// The file is written with mode 600 on Unix.
    pub fn secret_file(&self) -> PathBuf {
        self.root.join("secret.json")
    }

    /// Returns the path to the session flag file.
    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.json")
    }
}
