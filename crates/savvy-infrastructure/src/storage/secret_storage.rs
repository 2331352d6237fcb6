//! Secret configuration file storage.
//!
//! Loads and stores the client-held credential in `secret.json`.

use std::path::{Path, PathBuf};

use savvy_core::config::SecretConfig;

use super::{StorageError, read_optional, write_file};

/// Storage for the secret configuration file (secret.json).
///
/// Responsibilities:
/// - Load secret.json and parse it into [`SecretConfig`]
/// - Write it back with user-only permissions
///
/// Does NOT:
/// - Validate API keys
/// - Provide any built-in fallback key
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(StorageError::NotFound)`: File doesn't exist
    /// - `Err(StorageError::Io)`: Failed to read file
    /// - `Err(StorageError::Json)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, StorageError> {
        let content =
            read_optional(&self.path)?.ok_or_else(|| StorageError::NotFound(self.path.clone()))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the secret configuration as pretty JSON, mode 600.
    pub fn save(&self, secrets: &SecretConfig) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(secrets)?;
        write_file(&self.path, &json, true)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load() {
            Err(StorageError::NotFound(path)) => assert_eq!(path, file_path),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ "gemini": { "api_key": "test-key-123" } }"#).unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();
        assert_eq!(config.gemini_api_key(), Some("test-key-123"));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, "{ invalid json").unwrap();

        let result = SecretStorage::with_path(file_path).load();
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[test]
    fn test_save_creates_dirs_and_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        storage
            .save(&SecretConfig::with_gemini_api_key("abc"))
            .unwrap();
        assert!(storage.exists());
        assert_eq!(storage.load().unwrap().gemini_api_key(), Some("abc"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
