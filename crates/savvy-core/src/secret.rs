//! Secret management service trait.
//!
//! Defines the interface for loading and storing the client-held API key.

use crate::config::SecretConfig;

/// Service for managing secret configuration.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
/// - No built-in fallback key exists; a missing key means "not configured"
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// A missing secret file is not an error: it yields an empty
    /// [`SecretConfig`]. The error string must not contain secrets.
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Replaces the stored secret configuration.
    async fn save_secrets(&self, secrets: &SecretConfig) -> Result<(), String>;

    /// Checks if the secret file exists.
    async fn secret_file_exists(&self) -> bool;
}
