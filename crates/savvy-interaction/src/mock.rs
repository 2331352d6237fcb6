//! Tier 3: canned replies from the local catalog. Never touches the network.

use std::sync::Arc;

use async_trait::async_trait;
use savvy_core::content::{Catalog, DEFAULT_PICK_COUNT, Shuffler};

use crate::error::ResponderError;
use crate::heuristics::default_suggestions;
use crate::{ResolveRequest, ResolvedReply, Responder, ResolverTier};

pub const TREND_TEMPLATE: &str = "Based on what's showing up across fashion blogs right now, relaxed tailoring, earthy neutrals and statement accessories are leading the season. Here are a few articles on the latest trends:";
pub const STYLE_TEMPLATE: &str = "A reliable formula is to pair well-fitted basics with one standout piece, then finish with accessories that echo its color. These articles have more outfit ideas:";
pub const COLOR_TEMPLATE: &str = "This season's palette leans on rich earth tones like chocolate, olive and burgundy, with a few bright accents for contrast. Here's some reading on working color into your wardrobe:";
pub const GENERIC_TEMPLATE: &str = "I'd be happy to help with that! Here are some fashion articles you might find interesting:";

/// Which canned reply a message gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Trend,
    Style,
    Color,
    General,
}

impl Topic {
    fn of(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("trend") {
            Self::Trend
        } else if text.contains("style") || text.contains("outfit") {
            Self::Style
        } else if text.contains("color") {
            Self::Color
        } else {
            Self::General
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Trend => TREND_TEMPLATE,
            Self::Style => STYLE_TEMPLATE,
            Self::Color => COLOR_TEMPLATE,
            Self::General => GENERIC_TEMPLATE,
        }
    }
}

pub struct MockResponder {
    catalog: Arc<Catalog>,
    shuffler: Arc<dyn Shuffler>,
}

impl MockResponder {
    pub fn new(catalog: Arc<Catalog>, shuffler: Arc<dyn Shuffler>) -> Self {
        Self { catalog, shuffler }
    }
}

#[async_trait]
impl Responder for MockResponder {
    fn tier(&self) -> ResolverTier {
        ResolverTier::Mock
    }

    async fn respond(&self, request: &ResolveRequest) -> Result<ResolvedReply, ResponderError> {
        let topic = Topic::of(request.last_user_text());
        Ok(ResolvedReply {
            reply: topic.template().to_string(),
            suggested_options: default_suggestions(),
            recommended_articles: self
                .shuffler
                .sample(self.catalog.articles(), DEFAULT_PICK_COUNT),
            tier: ResolverTier::Mock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savvy_core::content::SeededShuffler;
    use savvy_core::conversation::ChatTurn;
    use savvy_core::preference::PreferenceSet;

    fn ask(text: &str) -> ResolveRequest {
        ResolveRequest::new(
            vec![ChatTurn::assistant("Hello!"), ChatTurn::user(text)],
            PreferenceSet::default(),
        )
    }

    #[test]
    fn test_topic_priority() {
        assert_eq!(Topic::of("trendy outfit colors"), Topic::Trend);
        assert_eq!(Topic::of("How do I STYLE a blazer"), Topic::Style);
        assert_eq!(Topic::of("an outfit for a wedding"), Topic::Style);
        assert_eq!(Topic::of("best color for fall"), Topic::Color);
        assert_eq!(Topic::of("sustainable brands"), Topic::General);
    }

    #[tokio::test]
    async fn test_always_attaches_three_articles() {
        let catalog = Arc::new(Catalog::builtin());
        let expected = SeededShuffler::new(7).sample(catalog.articles(), 3);
        let mock = MockResponder::new(catalog, Arc::new(SeededShuffler::new(7)));

        let reply = mock.respond(&ask("sustainable brands")).await.unwrap();
        assert_eq!(reply.reply, GENERIC_TEMPLATE);
        assert_eq!(reply.recommended_articles, expected);
        assert_eq!(reply.suggested_options, default_suggestions());
        assert_eq!(reply.tier, ResolverTier::Mock);
    }

    #[tokio::test]
    async fn test_uses_latest_user_message() {
        let mock = MockResponder::new(Arc::new(Catalog::builtin()), Arc::new(SeededShuffler::new(1)));
        let request = ResolveRequest::new(
            vec![
                ChatTurn::user("what colors work for me"),
                ChatTurn::assistant("..."),
                ChatTurn::user("show me trends"),
            ],
            PreferenceSet::default(),
        );
        let reply = mock.respond(&request).await.unwrap();
        assert_eq!(reply.reply, TREND_TEMPLATE);
    }
}
