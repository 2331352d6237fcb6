//! Input classifiers.
//!
//! Pure functions over raw user text. The controller gates and routes input
//! with these; none of them touch conversation state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::taxonomy::is_taxonomy_term;

/// Fashion-domain words matched as case-insensitive substrings.
pub const FASHION_KEYWORDS: [&str; 34] = [
    "fashion",
    "styl",
    "outfit",
    "wear",
    "cloth",
    "dress",
    "trend",
    "look",
    "wardrobe",
    "color",
    "colour",
    "season",
    "shoe",
    "accessor",
    "jean",
    "denim",
    "jacket",
    "coat",
    "shirt",
    "skirt",
    "pant",
    "sneaker",
    "boot",
    "bag",
    "jewel",
    "vintage",
    "designer",
    "runway",
    "brand",
    "tip",
    "inspiration",
    "preference",
    "couture",
    "sustainab",
];

/// Greeting phrases, matched as whole words so "fashion" is not a "hi".
pub const GREETING_PHRASES: [&str; 4] = ["hi", "hello", "how are you", "hey"];

static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = GREETING_PHRASES
        .iter()
        .map(|phrase| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("greeting pattern is valid")
});

static TREND_RE: Lazy<Regex> = Lazy::new(|| case_insensitive("trend"));
static TIP_RE: Lazy<Regex> = Lazy::new(|| case_insensitive("tip"));
static INSPIRATION_RE: Lazy<Regex> = Lazy::new(|| case_insensitive("inspiration"));
static PREFERENCE_RE: Lazy<Regex> = Lazy::new(|| case_insensitive("preference|set"));

fn case_insensitive(pattern: &str) -> Regex {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("intent pattern is valid")
}

/// What a greeting-state input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Trends,
    Tips,
    Inspiration,
    Preferences,
    Other,
}

/// True if the text contains a greeting phrase as a whole word.
///
/// The phrase may sit anywhere in the text, in any case, but substrings do
/// not count: "this", "chic" and "fashion" are not greetings.
pub fn is_simple_greeting(text: &str) -> bool {
    GREETING_RE.is_match(text)
}

/// True if the text is on-topic for a fashion assistant.
///
/// Accepts any fashion keyword as a substring, or an exact taxonomy value
/// (so every category, season and tag the assistant offers passes).
pub fn is_fashion_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    FASHION_KEYWORDS.iter().any(|word| lower.contains(word)) || is_taxonomy_term(text.trim())
}

/// Classifies greeting-state input, first match wins.
pub fn classify_intent(text: &str) -> Intent {
    if TREND_RE.is_match(text) {
        Intent::Trends
    } else if TIP_RE.is_match(text) {
        Intent::Tips
    } else if INSPIRATION_RE.is_match(text) {
        Intent::Inspiration
    } else if PREFERENCE_RE.is_match(text) {
        Intent::Preferences
    } else {
        Intent::Other
    }
}
