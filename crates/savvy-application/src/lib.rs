//! Application layer: the conversation controller.
//!
//! [`ChatController`] owns the conversation log and flow state for one
//! session, gates and routes every user action, and exposes the result as a
//! [`ChatView`] snapshot for whatever presentation layer sits on top.

mod controller;
mod view;

pub use controller::{ChatController, ChatOptions, OFF_TOPIC_NOTICE, TurnOutcome};
pub use view::ChatView;
