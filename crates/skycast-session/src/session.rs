//! Session state and the shared store that owns it.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reference to the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl UserRef {
    /// Synthesize a user reference when the backend returns no user object.
    pub fn from_identifier(identifier: &str) -> Self {
        Self { email: identifier.to_string(), username: None }
    }
}

/// Authentication state visible to the UI.
///
/// Invariant: `token.is_some()` iff `is_authenticated`, except while
/// `loading` marks the authenticating transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<UserRef>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    /// Cold-start state: validating a possibly persisted token.
    pub fn initial() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            loading: true,
            error: None,
        }
    }

    /// Fully signed-out state.
    pub fn unauthenticated() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            loading: false,
            error: None,
        }
    }

    pub fn authenticated(token: String, user: Option<UserRef>) -> Self {
        Self {
            is_authenticated: true,
            user,
            token: Some(token),
            loading: false,
            error: None,
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            loading: false,
            error: Some(message.into()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

/// Shared handle to the session, owned by the composition root and
/// passed by reference to everything that reads the token.
///
/// Overlapping mutations interleave with last-write-wins; the core
/// offers no mutual exclusion between login/logout/validation.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    /// Current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    pub(crate) fn set(&self, session: Session) {
        *self.inner.write() = session;
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut Session)) {
        f(&mut self.inner.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_authenticating() {
        let session = Session::initial();
        assert!(session.loading);
        assert!(!session.is_authenticated);
        assert!(session.token.is_none());
        assert!(session.error.is_none());
    }

    #[test]
    fn test_token_invariant() {
        let session = Session::authenticated("abc".to_string(), None);
        assert_eq!(session.is_authenticated, session.token.is_some());

        let session = Session::unauthenticated();
        assert_eq!(session.is_authenticated, session.token.is_some());

        let session = Session::errored("boom");
        assert_eq!(session.is_authenticated, session.token.is_some());
    }

    #[test]
    fn test_store_snapshot_is_isolated() {
        let store = SessionStore::new();
        let before = store.snapshot();
        store.set(Session::authenticated("abc".to_string(), None));
        assert!(!before.is_authenticated);
        assert!(store.snapshot().is_authenticated);
    }
}
