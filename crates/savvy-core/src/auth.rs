//! Session flag model.
//!
//! There is no real authentication: the presence of a stored
//! [`SignedInUser`] is what gates the chat. Credentials only get the
//! superficial format check the sign-in form performs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SavvyError};

pub const MIN_PASSWORD_LEN: usize = 6;

/// The persisted "is signed in" blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub email: String,
}

/// Accepts any email containing `@` and any password of at least six characters.
pub fn check_credentials(email: &str, password: &str) -> Result<SignedInUser> {
    let email = email.trim();
    if !email.contains('@') || password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SavvyError::validation(
            "Please enter a valid email and password (min 6 characters)",
        ));
    }
    Ok(SignedInUser {
        email: email.to_string(),
    })
}

/// Persistence for the session flag.
pub trait SessionFlagStore: Send + Sync {
    fn load(&self) -> Result<Option<SignedInUser>>;
    fn save(&self, user: &SignedInUser) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
