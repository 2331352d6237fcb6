//! Configuration models.
//!
//! `config.toml` carries non-secret settings ([`SavvyConfig`]); `secret.json`
//! carries the client-held credential ([`SecretConfig`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1/models";

/// Root of `config.toml`. Every section is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SavvyConfig {
    pub resolver: ResolverSettings,
    pub gemini: GeminiSettings,
    pub catalog: CatalogSettings,
    pub chat: ChatSettings,
}

/// Settings for the remote function tier and the resolver driver.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResolverSettings {
    /// Base URL of the remote chat function; `None` skips the tier.
    pub remote_endpoint: Option<String>,
    /// Upper bound for a single tier attempt.
    pub tier_timeout_secs: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            remote_endpoint: None,
            tier_timeout_secs: DEFAULT_TIER_TIMEOUT_SECS,
        }
    }
}

/// Generation settings for the direct Gemini tier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_output_tokens: 1000,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON file with an array of articles; the builtin catalog otherwise.
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ChatSettings {
    /// Apply the greeting short-circuit to option clicks as well.
    pub greet_on_options: bool,
}

/// Root configuration structure for secret.json
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API credential
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GeminiSecret {
    pub api_key: String,
}

impl std::fmt::Debug for GeminiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSecret")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SecretConfig {
    /// The Gemini key, if one is set and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|g| g.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    pub fn with_gemini_api_key(api_key: impl Into<String>) -> Self {
        Self {
            gemini: Some(GeminiSecret {
                api_key: api_key.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SavvyConfig = toml::from_str(
            r#"
            [resolver]
            remote_endpoint = "http://localhost:8000/api"

            [gemini]
            model = "gemini-2.0-flash"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.resolver.remote_endpoint.as_deref(),
            Some("http://localhost:8000/api")
        );
        assert_eq!(config.resolver.tier_timeout_secs, DEFAULT_TIER_TIMEOUT_SECS);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.max_output_tokens, 1000);
        assert!(!config.chat.greet_on_options);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: SavvyConfig = toml::from_str("").unwrap();
        assert_eq!(config, SavvyConfig::default());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        assert_eq!(SecretConfig::default().gemini_api_key(), None);
        assert_eq!(SecretConfig::with_gemini_api_key("  ").gemini_api_key(), None);
        assert_eq!(SecretConfig::with_gemini_api_key("k").gemini_api_key(), Some("k"));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let debug = format!("{:?}", SecretConfig::with_gemini_api_key("super-secret"));
        assert!(!debug.contains("super-secret"));
    }
}
