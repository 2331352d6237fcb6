//! Response tiers and the resolver that chains them.
//!
//! Each tier implements [`Responder`]. [`ResponseResolver`] tries them in
//! order (remote function, direct Gemini, local mock) and ends with
//! [`TerminalFallback`], which cannot fail.

pub mod error;
pub mod gemini;
pub mod heuristics;
pub mod mock;
pub mod remote_function;
pub mod resolver;
pub mod terminal;

pub use error::ResponderError;
pub use gemini::GeminiResponder;
pub use mock::MockResponder;
pub use remote_function::RemoteFunctionResponder;
pub use resolver::{Resolution, ResponseResolver};
pub use terminal::TerminalFallback;

use async_trait::async_trait;
use savvy_core::content::Article;
use savvy_core::conversation::ChatTurn;
use savvy_core::preference::PreferenceSet;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which stage of the fallback chain produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ResolverTier {
    #[strum(serialize = "remote function")]
    RemoteFunction,
    #[strum(serialize = "Gemini")]
    Gemini,
    #[strum(serialize = "local assistant")]
    Mock,
    #[strum(serialize = "offline fallback")]
    Terminal,
}

impl ResolverTier {
    /// Tiers that leave the process.
    pub fn is_remote(self) -> bool {
        matches!(self, Self::RemoteFunction | Self::Gemini)
    }
}

/// Input to every tier: the full history, oldest first, and the active preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveRequest {
    pub history: Vec<ChatTurn>,
    pub preferences: PreferenceSet,
}

impl ResolveRequest {
    pub fn new(history: Vec<ChatTurn>, preferences: PreferenceSet) -> Self {
        Self {
            history,
            preferences,
        }
    }

    /// Text of the most recent user turn, or `""`.
    pub fn last_user_text(&self) -> &str {
        self.history
            .iter()
            .rev()
            .find(|turn| turn.role == savvy_core::conversation::MessageRole::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or("")
    }
}

/// A reply from whichever tier succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReply {
    pub reply: String,
    pub suggested_options: Vec<String>,
    pub recommended_articles: Vec<Article>,
    pub tier: ResolverTier,
}

/// One stage of the fallback chain.
#[async_trait]
pub trait Responder: Send + Sync {
    fn tier(&self) -> ResolverTier;

    async fn respond(&self, request: &ResolveRequest) -> Result<ResolvedReply, ResponderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_user_text_skips_bot_turns() {
        let request = ResolveRequest::new(
            vec![
                ChatTurn::assistant("Hello!"),
                ChatTurn::user("show me denim"),
                ChatTurn::assistant("Sure"),
            ],
            PreferenceSet::default(),
        );
        assert_eq!(request.last_user_text(), "show me denim");
        assert_eq!(ResolveRequest::default().last_user_text(), "");
    }

    #[test]
    fn test_remote_tiers() {
        assert!(ResolverTier::RemoteFunction.is_remote());
        assert!(ResolverTier::Gemini.is_remote());
        assert!(!ResolverTier::Mock.is_remote());
        assert!(!ResolverTier::Terminal.is_remote());
    }
}
