//! Authenticated session model.
//!
//! Sessions live in memory only - a reload starts signed out. The bearer
//! token is wrapped in `SecretString` so it never appears in debug output
//! or logs.

use aurelle_core::Email;
use secrecy::SecretString;

/// The signed-in account behind a session.
#[derive(Debug, Clone)]
pub struct AccountUser {
    pub name: String,
    pub email: Email,
}

/// An authenticated user session.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user: AccountUser,
    /// Bearer token for authenticated backend calls.
    pub token: SecretString,
}

impl UserSession {
    /// Create a session from an account and its bearer token.
    #[must_use]
    pub fn new(user: AccountUser, token: SecretString) -> Self {
        Self { user, token }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = UserSession::new(
            AccountUser {
                name: "Ada".to_string(),
                email: Email::parse("ada@example.com").unwrap(),
            },
            SecretString::from("tok_super_secret"),
        );

        let debug_output = format!("{session:?}");
        assert!(!debug_output.contains("tok_super_secret"));
    }
}
