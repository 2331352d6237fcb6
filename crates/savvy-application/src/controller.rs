//! Conversation controller.
//!
//! Every user action goes through [`ChatController`]. Typed text and option
//! clicks are gated (greeting short-circuit, fashion relevance), appended to
//! the log, and routed either to the scripted flow or to the response
//! resolver:
//!
//! - preference-flow states always use the scripted flow
//! - the greeting state uses the resolver when it has a remote tier, and the
//!   scripted flow otherwise
//!
//! # Concurrency
//!
//! Only one turn resolves at a time. A new submission cancels the token of
//! the turn in flight and then waits on the turn lock; the superseded turn
//! returns [`TurnOutcome::Superseded`] without appending a reply.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use savvy_core::content::{Article, Catalog, Shuffler};
use savvy_core::conversation::flow::{
    BACK_TO_CHAT_REPLY, GREETING, PREFERENCES_APPLIED_REPLY, STYLE_PROMPT,
};
use savvy_core::conversation::{
    ConversationLog, DisplayMode, FlowState, ScriptedFlow, ScriptedStep, StepEffect,
    is_fashion_related, is_simple_greeting,
};
use savvy_core::preference::PreferenceSet;
use savvy_interaction::{ResolveRequest, Resolution, ResponseResolver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::view::ChatView;

pub const OFF_TOPIC_NOTICE: &str =
    "I can only help with fashion questions. Try asking about trends, styles or outfits.";

/// Controller behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatOptions {
    /// Apply the greeting short-circuit to option clicks too.
    pub greet_on_options: bool,
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Off-topic input; nothing was appended.
    Rejected { notice: String },
    /// Answered with the canned greeting, resolver not consulted.
    Greeted,
    /// A reply was appended. `notices` come from tiers that failed first.
    Replied { notices: Vec<String> },
    /// The preference editor was opened.
    PreferencesRequested,
    /// A newer submission cancelled this one.
    Superseded,
    /// Blank input.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Typed,
    Option,
}

#[derive(Debug, Default)]
struct Session {
    log: ConversationLog,
    state: FlowState,
    options: Vec<String>,
    results_visible: bool,
    recommended: Vec<Article>,
    preferences: PreferenceSet,
    show_preferences: bool,
    display_mode: DisplayMode,
}

impl Session {
    fn greet(&mut self) {
        self.log.push_bot(GREETING.message);
        self.options = GREETING.options_vec();
        self.state = FlowState::Greeting;
    }

    fn show_results(&mut self, articles: Vec<Article>) {
        self.recommended = articles;
        self.results_visible = true;
    }
}

pub struct ChatController {
    catalog: Arc<Catalog>,
    resolver: RwLock<Arc<ResponseResolver>>,
    shuffler: Arc<dyn Shuffler>,
    options: ChatOptions,
    session: Mutex<Session>,
    turn_lock: tokio::sync::Mutex<()>,
    current_turn: Mutex<CancellationToken>,
}

impl ChatController {
    pub fn new(
        catalog: Arc<Catalog>,
        resolver: Arc<ResponseResolver>,
        shuffler: Arc<dyn Shuffler>,
        options: ChatOptions,
    ) -> Self {
        Self {
            catalog,
            resolver: RwLock::new(resolver),
            shuffler,
            options,
            session: Mutex::new(Session::default()),
            turn_lock: tokio::sync::Mutex::new(()),
            current_turn: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn resolver(&self) -> Arc<ResponseResolver> {
        self.resolver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps the resolver used by later turns, e.g. after a key change.
    ///
    /// A turn already resolving keeps the resolver it started with.
    pub fn set_resolver(&self, resolver: Arc<ResponseResolver>) {
        *self.resolver.write().unwrap_or_else(PoisonError::into_inner) = resolver;
    }

    /// Emits the opening greeting. Does nothing once the log has messages.
    pub fn start(&self) {
        let mut session = self.session();
        if session.log.is_empty() {
            session.greet();
        }
    }

    pub async fn submit_user_text(&self, text: &str) -> TurnOutcome {
        self.submit(text, Source::Typed).await
    }

    pub async fn submit_option(&self, option: &str) -> TurnOutcome {
        self.submit(option, Source::Option).await
    }

    /// Replaces the preference set and shows matching articles.
    ///
    /// An empty set clears preferences without a message. Either way the
    /// conversation returns to the greeting state and the editor closes.
    pub fn set_preferences(&self, preferences: PreferenceSet) {
        self.supersede();
        let mut session = self.session();
        if !preferences.is_empty() {
            let articles = self.catalog.recommend(&preferences);
            info!(
                "Applied {} preference(s), {} article(s) match",
                preferences.len(),
                articles.len()
            );
            session.log.push_bot(PREFERENCES_APPLIED_REPLY);
            session.show_results(articles);
        }
        session.preferences = preferences;
        session.state = FlowState::Greeting;
        session.options = GREETING.options_vec();
        session.show_preferences = false;
    }

    pub fn toggle_article_display_mode(&self) -> DisplayMode {
        let mut session = self.session();
        session.display_mode = session.display_mode.toggled();
        session.display_mode
    }

    /// Starts the guided style, season, tag dialogue.
    pub fn begin_guided_preferences(&self) {
        self.supersede();
        let mut session = self.session();
        session.log.push_bot(STYLE_PROMPT.message);
        session.options = STYLE_PROMPT.options_vec();
        session.state = FlowState::AwaitingStylePreference;
        session.show_preferences = false;
    }

    pub fn open_preferences(&self) {
        let mut session = self.session();
        session.show_preferences = true;
        session.options.clear();
    }

    /// Hides the editor. The next chat turn also hides it.
    pub fn close_preferences(&self) {
        self.session().show_preferences = false;
    }

    /// Hides the article results and offers the greeting options again.
    ///
    /// Returns false when no results were showing.
    pub fn back_to_chat(&self) -> bool {
        let mut session = self.session();
        if !session.results_visible {
            return false;
        }
        session.results_visible = false;
        session.options = GREETING.options_vec();
        session.log.push_bot(BACK_TO_CHAT_REPLY);
        true
    }

    /// Clears the whole session, preferences included, and greets again.
    pub fn reset(&self) {
        self.supersede();
        let mut session = self.session();
        let display_mode = session.display_mode;
        *session = Session {
            display_mode,
            ..Session::default()
        };
        session.greet();
        info!("Session reset");
    }

    pub fn snapshot(&self) -> ChatView {
        let busy = self.turn_lock.try_lock().is_err();
        let session = self.session();
        ChatView {
            messages: session.log.messages().to_vec(),
            state: session.state,
            options: session.options.clone(),
            results_visible: session.results_visible,
            recommended_articles: session.recommended.clone(),
            preferences: session.preferences.clone(),
            show_preferences: session.show_preferences,
            display_mode: session.display_mode,
            busy,
        }
    }

    async fn submit(&self, text: &str, source: Source) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        let greeting_applies = source == Source::Typed || self.options.greet_on_options;
        if greeting_applies && is_simple_greeting(text) {
            self.supersede();
            let mut session = self.session();
            session.log.push_user(text);
            session.show_preferences = false;
            session.greet();
            debug!("Greeting short-circuit");
            return TurnOutcome::Greeted;
        }

        if !is_fashion_related(text) {
            warn!("Rejected off-topic input ({} chars)", text.len());
            return TurnOutcome::Rejected {
                notice: OFF_TOPIC_NOTICE.to_string(),
            };
        }

        let cancel = self.supersede();
        {
            let mut session = self.session();
            session.log.push_user(text);
            session.show_preferences = false;
        }

        let _turn = self.turn_lock.lock().await;
        if cancel.is_cancelled() {
            return TurnOutcome::Superseded;
        }

        let (state, request) = {
            let session = self.session();
            (
                session.state,
                ResolveRequest::new(session.log.to_history(), session.preferences.clone()),
            )
        };

        let resolver = self.resolver();
        if state.is_preference_flow() || !resolver.has_remote_tiers() {
            return self.run_scripted(text, &cancel);
        }

        // The terminal fallback always answers, so cancellation is the only error.
        match resolver.resolve(&request, &cancel).await {
            Ok(resolution) => self.apply_resolution(resolution, &cancel),
            Err(err) => {
                debug!("Turn abandoned: {}", err);
                TurnOutcome::Superseded
            }
        }
    }

    fn run_scripted(&self, text: &str, cancel: &CancellationToken) -> TurnOutcome {
        let mut session = self.session();
        if cancel.is_cancelled() {
            return TurnOutcome::Superseded;
        }
        let step = ScriptedFlow::new(&self.catalog, self.shuffler.as_ref()).step(session.state, text);
        debug!("Scripted step {} -> {}", session.state, step.next_state);
        apply_step(&mut session, step)
    }

    fn apply_resolution(&self, resolution: Resolution, cancel: &CancellationToken) -> TurnOutcome {
        let mut session = self.session();
        if cancel.is_cancelled() {
            return TurnOutcome::Superseded;
        }
        let reply = resolution.reply;
        info!("Reply from {} tier", reply.tier);
        session.log.push_bot(reply.reply);
        session.options = reply.suggested_options;
        if !reply.recommended_articles.is_empty() {
            session.show_results(reply.recommended_articles);
        }
        TurnOutcome::Replied {
            notices: resolution.notices,
        }
    }

    /// Cancels the turn in flight and hands out a token for the next one.
    fn supersede(&self) -> CancellationToken {
        let mut current = self
            .current_turn
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn apply_step(session: &mut Session, step: ScriptedStep) -> TurnOutcome {
    if let Some(reply) = step.reply {
        session.log.push_bot(reply);
    }
    if let Some(articles) = step.articles {
        session.show_results(articles);
    }
    session.options = step.options;
    session.state = step.next_state;

    match step.effect {
        StepEffect::None => TurnOutcome::Replied {
            notices: Vec::new(),
        },
        StepEffect::OpenPreferenceEditor => {
            session.show_preferences = true;
            TurnOutcome::PreferencesRequested
        }
        StepEffect::ApplyPreferences(preferences) => {
            session.preferences = preferences;
            TurnOutcome::Replied {
                notices: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savvy_core::content::FirstN;
    use savvy_core::preference::Preference;
    use savvy_interaction::TerminalFallback;

    fn offline_controller() -> ChatController {
        let catalog = Arc::new(Catalog::builtin());
        let resolver = ResponseResolver::new(TerminalFallback::new(catalog.clone(), Arc::new(FirstN)));
        let controller = ChatController::new(
            catalog,
            Arc::new(resolver),
            Arc::new(FirstN),
            ChatOptions::default(),
        );
        controller.start();
        controller
    }

    #[test]
    fn test_start_greets_once() {
        let controller = offline_controller();
        controller.start();
        let view = controller.snapshot();
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.last_bot_text(), Some(GREETING.message));
        assert_eq!(view.options, GREETING.options_vec());
        assert!(!view.busy);
    }

    #[test]
    fn test_set_preferences_recommends_and_resets_state() {
        let controller = offline_controller();
        controller.begin_guided_preferences();
        assert_eq!(controller.snapshot().state, FlowState::AwaitingStylePreference);

        controller.set_preferences(PreferenceSet::new(vec![
            Preference::category("Casual"),
            Preference::tag("Luxury"),
        ]));
        let view = controller.snapshot();
        assert_eq!(view.state, FlowState::Greeting);
        assert_eq!(view.last_bot_text(), Some(PREFERENCES_APPLIED_REPLY));
        let ids: Vec<_> = view.recommended_articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
        assert!(view.results_visible);
        assert_eq!(view.options, GREETING.options_vec());
        assert_eq!(view.preferences.len(), 2);
    }

    #[test]
    fn test_empty_preferences_add_no_message() {
        let controller = offline_controller();
        controller.open_preferences();
        controller.set_preferences(PreferenceSet::default());
        let view = controller.snapshot();
        assert_eq!(view.messages.len(), 1);
        assert!(!view.show_preferences);
        assert!(!view.results_visible);
    }

    #[test]
    fn test_toggle_display_mode() {
        let controller = offline_controller();
        assert_eq!(controller.toggle_article_display_mode(), DisplayMode::Compact);
        assert_eq!(controller.toggle_article_display_mode(), DisplayMode::Cards);
        assert_eq!(controller.snapshot().messages.len(), 1);
    }

    #[test]
    fn test_back_to_chat_only_with_results() {
        let controller = offline_controller();
        assert!(!controller.back_to_chat());

        controller.set_preferences(PreferenceSet::new(vec![Preference::season("Fall")]));
        assert!(controller.back_to_chat());
        let view = controller.snapshot();
        assert!(!view.results_visible);
        assert_eq!(view.last_bot_text(), Some(BACK_TO_CHAT_REPLY));
    }

    #[test]
    fn test_reset_clears_session_but_keeps_display_mode() {
        let controller = offline_controller();
        controller.toggle_article_display_mode();
        controller.set_preferences(PreferenceSet::new(vec![Preference::tag("Denim")]));
        controller.reset();

        let view = controller.snapshot();
        assert_eq!(view.messages.len(), 1);
        assert!(view.preferences.is_empty());
        assert!(!view.results_visible);
        assert_eq!(view.display_mode, DisplayMode::Compact);
    }

    #[tokio::test]
    async fn test_editor_closes_on_next_turn() {
        let controller = offline_controller();
        assert_eq!(
            controller.submit_option("Set My Preferences").await,
            TurnOutcome::PreferencesRequested
        );
        assert!(controller.snapshot().show_preferences);

        controller.submit_user_text("Show me the latest trends").await;
        assert!(!controller.snapshot().show_preferences);

        controller.open_preferences();
        controller.submit_user_text("Fashion Tips").await;
        assert!(!controller.snapshot().show_preferences);

        controller.open_preferences();
        assert_eq!(controller.submit_user_text("hi").await, TurnOutcome::Greeted);
        assert!(!controller.snapshot().show_preferences);
    }

    #[tokio::test]
    async fn test_off_topic_input_leaves_editor_open() {
        let controller = offline_controller();
        controller.open_preferences();
        assert!(matches!(
            controller.submit_user_text("what's the weather?").await,
            TurnOutcome::Rejected { .. }
        ));
        assert!(controller.snapshot().show_preferences);

        controller.close_preferences();
        assert!(!controller.snapshot().show_preferences);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let controller = offline_controller();
        assert_eq!(controller.submit_user_text("   ").await, TurnOutcome::Ignored);
        assert_eq!(controller.snapshot().messages.len(), 1);
    }
}
