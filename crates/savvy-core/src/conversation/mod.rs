//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: log entries and responder turns (`Message`, `ChatTurn`, `MessageRole`)
//! - `log`: the append-only `ConversationLog`
//! - `state`: `FlowState` and `DisplayMode`
//! - `intent`: greeting, relevance, and intent classifiers
//! - `flow`: the scripted state machine (`ScriptedFlow`)

pub mod flow;
pub mod intent;
mod log;
mod message;
mod state;

pub use flow::{FlowPrompt, ScriptedFlow, ScriptedStep, StepEffect};
pub use intent::{Intent, classify_intent, is_fashion_related, is_simple_greeting};
pub use log::ConversationLog;
pub use message::{ChatTurn, Message, MessageRole};
pub use state::{DisplayMode, FlowState};
