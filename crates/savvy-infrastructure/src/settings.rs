//! Startup loading of configuration and catalog.

use std::fs;

use savvy_core::config::{CatalogSettings, SavvyConfig};
use savvy_core::content::Catalog;
use savvy_core::{Result, SavvyError};

use crate::paths::SavvyPaths;
use crate::storage::ConfigStorage;

/// Environment variable that overrides the remote endpoint.
pub const REMOTE_ENDPOINT_ENV: &str = "SAVVY_REMOTE_ENDPOINT";
/// Environment variable that overrides the stored Gemini key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Loads `config.toml` and applies environment overrides.
///
/// `env` looks up a variable; pass `|k| std::env::var(k).ok()` in production.
pub fn load_config(paths: &SavvyPaths, env: impl Fn(&str) -> Option<String>) -> Result<SavvyConfig> {
    let mut config = ConfigStorage::with_path(paths.config_file()).load()?;
    apply_env_overrides(&mut config, env);
    Ok(config)
}

/// Applies `SAVVY_REMOTE_ENDPOINT` on top of a loaded config.
pub fn apply_env_overrides(config: &mut SavvyConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(endpoint) = env(REMOTE_ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("Remote endpoint overridden from {}", REMOTE_ENDPOINT_ENV);
        config.resolver.remote_endpoint = Some(endpoint);
    }
}

/// Loads the catalog named by the settings, or the builtin one.
pub fn load_catalog(settings: &CatalogSettings) -> Result<Catalog> {
    let Some(path) = &settings.path else {
        return Ok(Catalog::builtin());
    };
    let json = fs::read_to_string(path)
        .map_err(|e| SavvyError::io(format!("Failed to read catalog {}: {}", path.display(), e)))?;
    let catalog = Catalog::from_json_str(&json)?;
    if catalog.is_empty() {
        return Err(SavvyError::config(format!(
            "Catalog {} contains no articles",
            path.display()
        )));
    }
    tracing::info!("Loaded {} articles from {:?}", catalog.len(), path);
    Ok(catalog)
}
