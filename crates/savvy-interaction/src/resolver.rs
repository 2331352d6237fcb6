//! The fallback chain driver.
//!
//! Tiers are tried strictly in order; the first success wins. Every tier
//! failure is logged and turned into a short notice, never an error. When
//! all tiers fail the [`TerminalFallback`] answers, so the only error
//! [`ResponseResolver::resolve`] can return is [`SavvyError::Cancelled`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use savvy_core::config::{SavvyConfig, SecretConfig};
use savvy_core::content::{Catalog, Shuffler};
use savvy_core::{Result, SavvyError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ResponderError;
use crate::gemini::GeminiResponder;
use crate::mock::MockResponder;
use crate::remote_function::RemoteFunctionResponder;
use crate::terminal::TerminalFallback;
use crate::{ResolveRequest, ResolvedReply, Responder, ResolverTier};

/// A reply plus notices from the tiers that failed before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reply: ResolvedReply,
    pub notices: Vec<String>,
}

pub struct ResponseResolver {
    tiers: Vec<Arc<dyn Responder>>,
    terminal: TerminalFallback,
    tier_timeout: Duration,
}

impl ResponseResolver {
    /// A resolver with no tiers; every turn lands on `terminal`.
    pub fn new(terminal: TerminalFallback) -> Self {
        Self {
            tiers: Vec::new(),
            terminal,
            tier_timeout: Duration::from_secs(savvy_core::config::DEFAULT_TIER_TIMEOUT_SECS),
        }
    }

    /// Appends a tier after the existing ones.
    pub fn with_tier(mut self, tier: Arc<dyn Responder>) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn with_tier_timeout(mut self, timeout: Duration) -> Self {
        self.tier_timeout = timeout;
        self
    }

    /// Builds the standard chain: remote function, Gemini, mock, terminal.
    ///
    /// A tier whose endpoint or credential is missing is left out.
    pub fn from_settings(
        config: &SavvyConfig,
        secrets: &SecretConfig,
        catalog: Arc<Catalog>,
        shuffler: Arc<dyn Shuffler>,
        client: Client,
    ) -> Self {
        let mut resolver = Self::new(TerminalFallback::new(catalog.clone(), shuffler.clone()))
            .with_tier_timeout(Duration::from_secs(config.resolver.tier_timeout_secs.max(1)));

        match config
            .resolver
            .remote_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
        {
            Some(endpoint) => {
                resolver = resolver.with_tier(Arc::new(
                    RemoteFunctionResponder::new(endpoint, catalog.clone(), shuffler.clone())
                        .with_client(client.clone()),
                ));
            }
            None => debug!(
                "Skipping remote function tier: {}",
                ResponderError::NotConfigured("remote endpoint")
            ),
        }

        match secrets.gemini_api_key() {
            Some(api_key) => {
                resolver = resolver.with_tier(Arc::new(
                    GeminiResponder::new(
                        api_key,
                        config.gemini.clone(),
                        catalog.clone(),
                        shuffler.clone(),
                    )
                    .with_client(client),
                ));
            }
            None => debug!(
                "Skipping Gemini tier: {}",
                ResponderError::NotConfigured("Gemini API key")
            ),
        }

        resolver.with_tier(Arc::new(MockResponder::new(catalog, shuffler)))
    }

    /// The configured tiers in order, excluding the terminal fallback.
    pub fn tiers(&self) -> Vec<ResolverTier> {
        self.tiers.iter().map(|tier| tier.tier()).collect()
    }

    /// Whether any tier talks to a real responder.
    pub fn has_remote_tiers(&self) -> bool {
        self.tiers.iter().any(|tier| tier.tier().is_remote())
    }

    pub async fn resolve(
        &self,
        request: &ResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        let mut notices = Vec::new();

        for responder in &self.tiers {
            let tier = responder.tier();
            let error = match self.attempt(responder.as_ref(), request, cancel).await {
                Ok(reply) => {
                    info!("Reply resolved by {} tier", tier);
                    return Ok(Resolution { reply, notices });
                }
                Err(ResponderError::Cancelled) => return Err(SavvyError::Cancelled),
                Err(error) => error,
            };
            warn!("{} tier failed: {}", tier, error);
            notices.push(format!("The {tier} is unavailable, trying something else."));
        }

        if cancel.is_cancelled() {
            return Err(SavvyError::Cancelled);
        }
        info!("All tiers failed; using the offline fallback");
        Ok(Resolution {
            reply: self.terminal.reply(),
            notices,
        })
    }

    async fn attempt(
        &self,
        responder: &dyn Responder,
        request: &ResolveRequest,
        cancel: &CancellationToken,
    ) -> std::result::Result<ResolvedReply, ResponderError> {
        if cancel.is_cancelled() {
            return Err(ResponderError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ResponderError::Cancelled),
            outcome = tokio::time::timeout(self.tier_timeout, responder.respond(request)) => {
                outcome.unwrap_or_else(|_| Err(ResponderError::Timeout(self.tier_timeout)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use savvy_core::config::ResolverSettings;
    use savvy_core::content::FirstN;

    fn fallback() -> TerminalFallback {
        TerminalFallback::new(Arc::new(Catalog::builtin()), Arc::new(FirstN))
    }

    struct Failing(ResolverTier);

    #[async_trait]
    impl Responder for Failing {
        fn tier(&self) -> ResolverTier {
            self.0
        }

        async fn respond(&self, _: &ResolveRequest) -> std::result::Result<ResolvedReply, ResponderError> {
            Err(ResponderError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn test_from_settings_skips_unconfigured_tiers() {
        let catalog = Arc::new(Catalog::builtin());
        let resolver = ResponseResolver::from_settings(
            &SavvyConfig::default(),
            &SecretConfig::default(),
            catalog,
            Arc::new(FirstN),
            Client::new(),
        );
        assert_eq!(resolver.tiers(), vec![ResolverTier::Mock]);
        assert!(!resolver.has_remote_tiers());
    }

    #[test]
    fn test_from_settings_full_chain_order() {
        let config = SavvyConfig {
            resolver: ResolverSettings {
                remote_endpoint: Some("http://localhost:8000/api".to_string()),
                ..ResolverSettings::default()
            },
            ..SavvyConfig::default()
        };
        let resolver = ResponseResolver::from_settings(
            &config,
            &SecretConfig::with_gemini_api_key("k"),
            Arc::new(Catalog::builtin()),
            Arc::new(FirstN),
            Client::new(),
        );
        assert_eq!(
            resolver.tiers(),
            vec![ResolverTier::RemoteFunction, ResolverTier::Gemini, ResolverTier::Mock]
        );
        assert!(resolver.has_remote_tiers());
    }

    #[test]
    fn test_blank_endpoint_and_key_are_skipped() {
        let config = SavvyConfig {
            resolver: ResolverSettings {
                remote_endpoint: Some("  ".to_string()),
                ..ResolverSettings::default()
            },
            ..SavvyConfig::default()
        };
        let resolver = ResponseResolver::from_settings(
            &config,
            &SecretConfig::with_gemini_api_key(""),
            Arc::new(Catalog::builtin()),
            Arc::new(FirstN),
            Client::new(),
        );
        assert!(!resolver.has_remote_tiers());
    }

    #[tokio::test]
    async fn test_all_failing_lands_on_terminal() {
        let resolver = ResponseResolver::new(fallback())
            .with_tier(Arc::new(Failing(ResolverTier::RemoteFunction)))
            .with_tier(Arc::new(Failing(ResolverTier::Gemini)));

        let resolution = resolver
            .resolve(&ResolveRequest::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(resolution.reply.tier, ResolverTier::Terminal);
        assert_eq!(resolution.notices.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let resolver = ResponseResolver::new(fallback())
            .with_tier(Arc::new(MockResponder::new(Arc::new(Catalog::builtin()), Arc::new(FirstN))));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolver.resolve(&ResolveRequest::default(), &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
