//! In-memory session and transient UI state.
//!
//! Unlike the cart and wishlist, nothing here touches a storage adapter: a
//! reload starts signed out with the drawer closed.

use secrecy::SecretString;

use crate::models::UserSession;

/// Transient UI flags for the cart drawer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    pub cart_open: bool,
    pub cart_animating: bool,
}

/// Holds the authenticated session (if any) and transient UI flags.
#[derive(Debug, Default)]
pub struct SessionStore {
    user: Option<UserSession>,
    pub ui: UiState,
}

impl SessionStore {
    /// Start signed out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signed-in session.
    pub fn sign_in(&mut self, session: UserSession) {
        self.user = Some(session);
    }

    /// Drop the session and its token.
    pub fn sign_out(&mut self) {
        self.user = None;
    }

    /// The current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<&UserSession> {
        self.user.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Bearer token for authenticated backend calls.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        self.user.as_ref().map(|s| &s.token)
    }
}
