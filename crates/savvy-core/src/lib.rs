//! Domain layer of the Style Savvy Scribe fashion chat assistant.
//!
//! - [`content`]: the immutable article catalog and recommendation
//! - [`preference`]: user taste preferences
//! - [`conversation`]: message log, flow state, classifiers, scripted flow
//! - [`config`], [`secret`], [`auth`]: settings, credentials, session flag

pub mod auth;
pub mod config;
pub mod content;
pub mod conversation;
pub mod error;
pub mod preference;
pub mod secret;

// Re-export common error type
pub use error::{Result, SavvyError};
