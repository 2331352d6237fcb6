//! `config.toml` storage.

use std::path::{Path, PathBuf};

use savvy_core::config::SavvyConfig;

use super::{StorageError, read_optional, write_file};

/// Reads and writes [`SavvyConfig`]. A missing file means defaults.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<SavvyConfig, StorageError> {
        match read_optional(&self.path)? {
            Some(content) => Ok(toml::from_str(&content)?),
            None => {
                tracing::debug!("No config at {:?}, using defaults", self.path);
                Ok(SavvyConfig::default())
            }
        }
    }

    pub fn save(&self, config: &SavvyConfig) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(config)?;
        write_file(&self.path, &content, false)
    }

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
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), SavvyConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[chat]\ngreet_on_options = true\n").unwrap();

        let config = ConfigStorage::with_path(path).load().unwrap();
        assert!(config.chat.greet_on_options);
        assert!(config.resolver.remote_endpoint.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[resolver\n").unwrap();
        assert!(matches!(
            ConfigStorage::with_path(path).load(),
            Err(StorageError::TomlDe(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        let mut config = SavvyConfig::default();
        config.resolver.remote_endpoint = Some("http://localhost:8000/api".to_string());
        config.resolver.tier_timeout_secs = 5;

        storage.save(&config).unwrap();
        assert_eq!(storage.load().unwrap(), config);
    }
}
