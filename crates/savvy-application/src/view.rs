use savvy_core::content::Article;
use savvy_core::conversation::{DisplayMode, FlowState, Message};
use savvy_core::preference::PreferenceSet;
use serde::Serialize;

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub messages: Vec<Message>,
    pub state: FlowState,
    /// Option chips offered under the last bot message.
    pub options: Vec<String>,
    pub results_visible: bool,
    pub recommended_articles: Vec<Article>,
    pub preferences: PreferenceSet,
    /// Whether the preference editor is open.
    pub show_preferences: bool,
    pub display_mode: DisplayMode,
    /// A resolver turn is in flight.
    pub busy: bool,
}

impl ChatView {
    pub fn last_bot_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_bot)
            .map(|m| m.text.as_str())
    }
}
