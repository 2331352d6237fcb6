//! Shared reply enrichment used by the remote tiers.

use once_cell::sync::Lazy;
use regex::Regex;
use savvy_core::content::{Article, Catalog, DEFAULT_PICK_COUNT, Shuffler};

/// Follow-up options offered when a tier does not supply its own.
pub const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "What are the latest fashion trends?",
    "How can I style a basic outfit?",
    "What colors are popular this season?",
    "Recommend sustainable fashion brands",
];

static RECOMMENDATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)recommend|suggest|trend").expect("recommendation pattern is valid")
});

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Whether a reply reads like it is recommending something.
pub fn wants_recommendations(reply: &str) -> bool {
    RECOMMENDATION_RE.is_match(reply)
}

/// Fills in articles for a reply that talks about recommendations but came
/// back without any.
pub fn attach_articles(
    reply: &str,
    supplied: Vec<Article>,
    catalog: &Catalog,
    shuffler: &dyn Shuffler,
) -> Vec<Article> {
    if supplied.is_empty() && wants_recommendations(reply) {
        shuffler.sample(catalog.articles(), DEFAULT_PICK_COUNT)
    } else {
        supplied
    }
}
