//! Scripted conversation flow.
//!
//! The local fallback used when no responder is available, and the whole of
//! the guided preference dialogue. Given the current [`FlowState`] and the
//! user's text, [`ScriptedFlow::step`] returns every effect of the turn as
//! data; applying it is the controller's job.

use crate::content::{Article, CATEGORIES, Catalog, DEFAULT_PICK_COUNT, SEASONS, Shuffler, TAGS};
use crate::preference::{Preference, PreferenceSet};

use super::intent::{Intent, classify_intent};
use super::state::FlowState;

/// A bot prompt together with the options offered alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowPrompt {
    pub message: &'static str,
    pub options: &'static [&'static str],
}

impl FlowPrompt {
    pub fn options_vec(&self) -> Vec<String> {
        self.options.iter().map(|o| o.to_string()).collect()
    }
}

pub const GREETING_OPTIONS: [&str; 4] = [
    "Latest Trends",
    "Fashion Tips",
    "Style Inspiration",
    "Set My Preferences",
];

pub const GREETING: FlowPrompt = FlowPrompt {
    message: "Hello! I'm your fashion assistant. I can help you discover the latest trends and articles from top fashion blogs. What are you interested in today?",
    options: &GREETING_OPTIONS,
};

pub const STYLE_PROMPT: FlowPrompt = FlowPrompt {
    message: "Let's personalize your experience. What styles are you most interested in?",
    options: &CATEGORIES,
};

pub const SEASON_PROMPT: FlowPrompt = FlowPrompt {
    message: "Which season are you shopping for?",
    options: &SEASONS,
};

pub const TAG_PROMPT: FlowPrompt = FlowPrompt {
    message: "Any specific fashion themes you're interested in?",
    options: &TAGS,
};

pub const TRENDS_REPLY: &str = "Here are the latest fashion trends based on recent blog posts:";
pub const TIPS_REPLY: &str = "I've found these helpful fashion tips from popular blogs:";
pub const INSPIRATION_REPLY: &str = "Looking for inspiration? Check out these posts:";
pub const GENERIC_REPLY: &str = "Here are some fashion articles you might find interesting:";
pub const FLOW_COMPLETE_REPLY: &str =
    "Thanks for setting your preferences! Here are some personalized recommendations:";
pub const PREFERENCES_APPLIED_REPLY: &str =
    "Based on your preferences, here are some personalized recommendations:";
pub const BACK_TO_CHAT_REPLY: &str = "Is there anything else you'd like to explore?";

/// Catalog positions shown for style inspiration.
const INSPIRATION_RANGE: std::ops::Range<usize> = 2..5;

/// Side effects of a step beyond the reply itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEffect {
    None,
    /// Ask the presentation layer to open the preference editor.
    OpenPreferenceEditor,
    /// Replace the active preference set.
    ApplyPreferences(PreferenceSet),
}

/// Everything one scripted turn produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedStep {
    pub reply: Option<String>,
    /// `Some` shows these articles as results.
    pub articles: Option<Vec<Article>>,
    /// Replaces the pending option list.
    pub options: Vec<String>,
    pub next_state: FlowState,
    pub effect: StepEffect,
}

impl ScriptedStep {
    fn results(reply: &str, articles: Vec<Article>) -> Self {
        Self {
            reply: Some(reply.to_string()),
            articles: Some(articles),
            options: Vec::new(),
            next_state: FlowState::Greeting,
            effect: StepEffect::None,
        }
    }

    fn prompt(prompt: FlowPrompt, next_state: FlowState) -> Self {
        Self {
            reply: Some(prompt.message.to_string()),
            articles: None,
            options: prompt.options_vec(),
            next_state,
            effect: StepEffect::None,
        }
    }
}

/// The local scripted state machine.
pub struct ScriptedFlow<'a> {
    catalog: &'a Catalog,
    shuffler: &'a dyn Shuffler,
}

impl<'a> ScriptedFlow<'a> {
    pub fn new(catalog: &'a Catalog, shuffler: &'a dyn Shuffler) -> Self {
        Self { catalog, shuffler }
    }

    /// Computes the outcome of `text` arriving in `state`.
    ///
    /// Deterministic except for the unmatched greeting branch, whose picks
    /// come from the injected [`Shuffler`].
    pub fn step(&self, state: FlowState, text: &str) -> ScriptedStep {
        match state {
            FlowState::Greeting => self.greeting_step(classify_intent(text)),
            FlowState::AwaitingStylePreference => {
                ScriptedStep::prompt(SEASON_PROMPT, FlowState::AwaitingSeasonPreference)
            }
            FlowState::AwaitingSeasonPreference => {
                ScriptedStep::prompt(TAG_PROMPT, FlowState::AwaitingTagPreference)
            }
            FlowState::AwaitingTagPreference => {
                let preferences = PreferenceSet::new(vec![Preference::tag(text.trim())]);
                let articles = self.catalog.recommend(&preferences);
                ScriptedStep {
                    reply: Some(FLOW_COMPLETE_REPLY.to_string()),
                    articles: Some(articles),
                    options: GREETING.options_vec(),
                    next_state: FlowState::Greeting,
                    effect: StepEffect::ApplyPreferences(preferences),
                }
            }
        }
    }

    fn greeting_step(&self, intent: Intent) -> ScriptedStep {
        match intent {
            Intent::Trends => ScriptedStep::results(TRENDS_REPLY, self.catalog.trending()),
            Intent::Tips => ScriptedStep::results(TIPS_REPLY, self.catalog.default_picks()),
            Intent::Inspiration => {
                ScriptedStep::results(INSPIRATION_REPLY, self.catalog.slice(INSPIRATION_RANGE))
            }
            Intent::Preferences => ScriptedStep {
                reply: None,
                articles: None,
                options: Vec::new(),
                next_state: FlowState::Greeting,
                effect: StepEffect::OpenPreferenceEditor,
            },
            Intent::Other => ScriptedStep::results(
                GENERIC_REPLY,
                self.shuffler
                    .sample(self.catalog.articles(), DEFAULT_PICK_COUNT),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FirstN, SeededShuffler};

    fn ids(step: &ScriptedStep) -> Vec<String> {
        step.articles
            .as_ref()
            .map(|articles| articles.iter().map(|a| a.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_trends_only_returns_trending_articles() {
        let catalog = Catalog::builtin();
        let flow = ScriptedFlow::new(&catalog, &FirstN);
        let step = flow.step(FlowState::Greeting, "Show me the latest trends");

        let articles = step.articles.as_ref().unwrap();
        assert!(!articles.is_empty());
        assert!(articles.iter().all(|a| a.has_tag("Trending")));
        assert_eq!(step.reply.as_deref(), Some(TRENDS_REPLY));
        assert!(step.options.is_empty());
    }

    #[test]
    fn test_tips_and_inspiration_slices() {
        let catalog = Catalog::builtin();
        let flow = ScriptedFlow::new(&catalog, &FirstN);
        assert_eq!(ids(&flow.step(FlowState::Greeting, "Fashion Tips")), vec!["1", "2", "3"]);
        assert_eq!(
            ids(&flow.step(FlowState::Greeting, "I want style inspiration")),
            vec!["3", "4", "5"]
        );
    }

    #[test]
    fn test_preferences_opens_editor() {
        let catalog = Catalog::builtin();
        let flow = ScriptedFlow::new(&catalog, &FirstN);
        let step = flow.step(FlowState::Greeting, "Set My Preferences");
        assert_eq!(step.effect, StepEffect::OpenPreferenceEditor);
        assert!(step.reply.is_none());
        assert!(step.options.is_empty());
        assert_eq!(step.next_state, FlowState::Greeting);
    }

    #[test]
    fn test_unmatched_greeting_uses_shuffler() {
        let catalog = Catalog::builtin();
        let seeded = SeededShuffler::new(42);
        let expected = SeededShuffler::new(42).sample(catalog.articles(), 3);

        let step = ScriptedFlow::new(&catalog, &seeded).step(FlowState::Greeting, "denim jackets");
        assert_eq!(step.articles, Some(expected));
        assert_eq!(step.reply.as_deref(), Some(GENERIC_REPLY));
    }

    #[test]
    fn test_guided_dialogue_walks_all_states() {
        let catalog = Catalog::builtin();
        let flow = ScriptedFlow::new(&catalog, &FirstN);

        let season = flow.step(FlowState::AwaitingStylePreference, "Casual");
        assert_eq!(season.next_state, FlowState::AwaitingSeasonPreference);
        assert_eq!(season.options.len(), SEASONS.len());

        let tag = flow.step(season.next_state, "Summer");
        assert_eq!(tag.next_state, FlowState::AwaitingTagPreference);
        assert_eq!(tag.reply.as_deref(), Some(TAG_PROMPT.message));

        let done = flow.step(tag.next_state, "Denim");
        assert_eq!(done.next_state, FlowState::Greeting);
        assert_eq!(ids(&done), vec!["6"]);
        assert_eq!(done.options, GREETING.options_vec());
        match done.effect {
            StepEffect::ApplyPreferences(prefs) => {
                assert_eq!(prefs.len(), 1);
                assert_eq!(prefs.get("tag").map(|p| p.value.as_str()), Some("Denim"));
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn test_tag_step_with_unknown_value_keeps_full_catalog() {
        let catalog = Catalog::builtin();
        let flow = ScriptedFlow::new(&catalog, &FirstN);
        let done = flow.step(FlowState::AwaitingTagPreference, "sparkly things");
        assert_eq!(ids(&done), vec!["1", "2", "3", "4", "5", "6"]);
    }
}
