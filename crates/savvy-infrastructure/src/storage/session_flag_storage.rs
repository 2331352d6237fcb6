//! `session.json` storage for the signed-in flag.

use std::fs;
use std::path::PathBuf;

use savvy_core::Result;
use savvy_core::auth::{SessionFlagStore, SignedInUser};

use super::{StorageError, read_optional, write_file};

/// Keeps the session flag in a JSON file.
pub struct FileSessionFlagStore {
    path: PathBuf,
}

impl FileSessionFlagStore {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionFlagStore for FileSessionFlagStore {
    fn load(&self) -> Result<Option<SignedInUser>> {
        let Some(content) = read_optional(&self.path)? else {
            return Ok(None);
        };
        match serde_json::from_str::<SignedInUser>(&content) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session flag at {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    fn save(&self, user: &SignedInUser) -> Result<()> {
        let json = serde_json::to_string(user)?;
        write_file(&self.path, &json, true)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }
}
