//! Secret service implementation.
//!
//! This module provides a service for managing the client-held API key
//! stored in secret.json.

use std::sync::{Arc, RwLock};

use savvy_core::config::SecretConfig;
use savvy_core::secret::SecretService;

use crate::paths::SavvyPaths;
use crate::storage::{SecretStorage, StorageError};

/// Service for managing secret configuration.
///
/// Reads secret.json through [`SecretStorage`] and caches it. An API key
/// injected from the environment takes precedence over the stored one and
/// is never written back to disk.
///
/// # Example
///
/// ```ignore
/// use savvy_infrastructure::SecretServiceImpl;
/// use savvy_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(&paths)
///     .with_api_key_override(std::env::var("GEMINI_API_KEY").ok());
/// let secrets = service.load_secrets().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    /// Cached secret config loaded from storage.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    storage: Arc<SecretStorage>,
    api_key_override: Option<String>,
}

impl SecretServiceImpl {
    pub fn new(paths: &SavvyPaths) -> Self {
        Self::from_storage(SecretStorage::with_path(paths.secret_file()))
    }

    pub fn from_storage(storage: SecretStorage) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            storage: Arc::new(storage),
            api_key_override: None,
        }
    }

    /// Uses `api_key` instead of the stored key when it is set and non-blank.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        self.api_key_override = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Loads the secrets from storage if not already cached.
    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        {
            let read_lock = self.secrets.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(self.apply_override(cached.clone()));
            }
        }

        let loaded = match self.storage.load() {
            Ok(config) => config,
            Err(StorageError::NotFound(_)) => SecretConfig::default(),
            Err(e) => return Err(format!("Failed to load secret.json: {}", e)),
        };

        {
            let mut write_lock = self.secrets.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(self.apply_override(loaded))
    }

    fn apply_override(&self, config: SecretConfig) -> SecretConfig {
        match &self.api_key_override {
            Some(key) => SecretConfig::with_gemini_api_key(key.clone()),
            None => config,
        }
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn save_secrets(&self, secrets: &SecretConfig) -> Result<(), String> {
        self.storage
            .save(secrets)
            .map_err(|e| format!("Failed to save secret.json: {}", e))?;
        let mut write_lock = self.secrets.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(secrets.clone());
        tracing::info!("Saved secret configuration to {:?}", self.storage.path());
        Ok(())
    }

    async fn secret_file_exists(&self) -> bool {
        self.storage.exists()
    }
}
