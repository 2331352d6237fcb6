//! The floor of the fallback chain.

use std::sync::Arc;

use savvy_core::content::{Catalog, DEFAULT_PICK_COUNT, Shuffler};

use crate::heuristics::default_suggestions;
use crate::{ResolvedReply, ResolverTier};

pub const APOLOGY_REPLY: &str = "I'm sorry, I'm having trouble connecting to my fashion knowledge right now. In the meantime, here are some articles you might enjoy:";

/// Produces a reply without any I/O. Cannot fail.
#[derive(Clone)]
pub struct TerminalFallback {
    catalog: Arc<Catalog>,
    shuffler: Arc<dyn Shuffler>,
}

impl TerminalFallback {
    pub fn new(catalog: Arc<Catalog>, shuffler: Arc<dyn Shuffler>) -> Self {
        Self { catalog, shuffler }
    }

    pub fn reply(&self) -> ResolvedReply {
        ResolvedReply {
            reply: APOLOGY_REPLY.to_string(),
            suggested_options: default_suggestions(),
            recommended_articles: self
                .shuffler
                .sample(self.catalog.articles(), DEFAULT_PICK_COUNT),
            tier: ResolverTier::Terminal,
        }
    }
}
