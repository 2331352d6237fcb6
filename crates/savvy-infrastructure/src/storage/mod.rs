//! File-backed storage for configuration, secrets, and the session flag.

mod config_storage;
mod secret_storage;
mod session_flag_storage;

use std::fs;
use std::path::{Path, PathBuf};

use savvy_core::SavvyError;
use thiserror::Error;

pub use config_storage::ConfigStorage;
pub use secret_storage::SecretStorage;
pub use session_flag_storage::FileSessionFlagStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File not found.
    #[error("File not found at: {}", .0.display())]
    NotFound(PathBuf),
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl From<StorageError> for SavvyError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => {
                SavvyError::not_found("file", path.display().to_string())
            }
            StorageError::Io(e) => e.into(),
            StorageError::Json(e) => e.into(),
            StorageError::TomlDe(e) => e.into(),
            StorageError::TomlSer(e) => e.into(),
        }
    }
}

/// Reads a file, mapping a missing file to `Ok(None)`.
fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes `contents`, creating parent directories.
///
/// With `private` set the file gets mode 600 on Unix.
fn write_file(path: &Path, contents: &str, private: bool) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;

    // Set file permissions to 600 (user read/write only) on Unix
    #[cfg(unix)]
    {
        if private {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    Ok(())
}
