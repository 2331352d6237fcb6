//! Conversation flow state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The active step of the scripted conversation.
///
/// Exactly one state is active at a time. Transitions happen only in
/// response to user input or a preference submission.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Greeting,
    AwaitingStylePreference,
    AwaitingSeasonPreference,
    AwaitingTagPreference,
}

impl FlowState {
    /// True while the guided preference dialogue is running.
    pub fn is_preference_flow(self) -> bool {
        !matches!(self, Self::Greeting)
    }
}

/// How recommended articles are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DisplayMode {
    /// Full cards with excerpt and link.
    #[default]
    Cards,
    /// One line per article.
    Compact,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Cards => Self::Compact,
            Self::Compact => Self::Cards,
        }
    }
}
