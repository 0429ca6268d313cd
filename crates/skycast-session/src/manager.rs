//! Authentication state machine.
//!
//! Drives the session store through login, registration, logout and
//! cold-start token validation. The persisted token is written before
//! the session is marked authenticated, so a crash between the two
//! leaves a recoverable token rather than a phantom session.

use std::sync::Arc;

use skycast_core::error::{AppError, AuthError, ValidationError};
use skycast_core::storage::{keys, KeyValueStore};

use crate::client::AuthClient;
use crate::session::{Session, SessionStore, UserRef};

pub struct SessionManager {
    client: AuthClient,
    store: SessionStore,
    kv: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(client: AuthClient, store: SessionStore, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { client, store, kv }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token is persisted and the session becomes
    /// authenticated. On failure the session is reset with the backend's
    /// error message where one was supplied.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<(), AppError> {
        if identifier.trim().is_empty() {
            return self.fail_login(ValidationError::EmptyField("username").into());
        }
        if secret.is_empty() {
            return self.fail_login(ValidationError::EmptyField("password").into());
        }

        self.store.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let response = match self.client.login(identifier, secret).await {
            Ok(r) => r,
            Err(e) => return self.fail_login(e),
        };

        let user = response.user.clone();
        let Some(token) = response.into_token() else {
            return self.fail_login(AuthError::LoginFailed("Login failed".to_string()).into());
        };

        // Persist before transitioning; the authenticated state must
        // never outrun the stored token.
        if let Err(e) = self.kv.set(keys::ACCESS_TOKEN, &token) {
            return self.fail_login(e.into());
        }

        let user = user.or_else(|| Some(UserRef::from_identifier(identifier)));
        self.store.set(Session::authenticated(token, user));
        tracing::info!("Login succeeded for {}", identifier);
        Ok(())
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// A login failure after successful account creation surfaces the
    /// login error, not a registration error. Long-standing behavior;
    /// callers depend on the message.
    pub async fn register(
        &self,
        username: &str,
        identifier: &str,
        secret: &str,
    ) -> Result<(), AppError> {
        if username.trim().is_empty() {
            return self.fail_login(ValidationError::EmptyField("username").into());
        }

        self.store.update(|s| {
            s.loading = true;
            s.error = None;
        });

        if let Err(e) = self.client.register(username, identifier, secret).await {
            return self.fail_login(e);
        }

        self.login(identifier, secret).await
    }

    /// Purge the persisted token and reset the session unconditionally.
    pub fn logout(&self) {
        tracing::info!("Logging out");
        if let Err(e) = self.kv.remove(keys::ACCESS_TOKEN) {
            tracing::warn!("Failed to purge persisted token on logout: {}", e);
        }
        self.store.set(Session::unauthenticated());
    }

    /// Cold-start validation of a persisted token.
    ///
    /// Absent token: straight to unauthenticated, no error. Present but
    /// unverifiable token, or unreadable storage: purge the token and
    /// surface a fixed expiry message.
    pub async fn validate_startup(&self) {
        let token = match self.kv.get(keys::ACCESS_TOKEN) {
            Ok(Some(t)) => t,
            Ok(None) => {
                self.store.set(Session::unauthenticated());
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted token: {}", e);
                self.expire_session();
                return;
            }
        };

        match self.client.check_token(&token).await {
            Ok(()) => {
                tracing::info!("Persisted token validated");
                self.store.set(Session::authenticated(token, None));
            }
            Err(e) => {
                tracing::warn!("Startup token validation failed: {}", e);
                self.expire_session();
            }
        }
    }

    fn expire_session(&self) {
        if let Err(e) = self.kv.remove(keys::ACCESS_TOKEN) {
            tracing::warn!("Failed to purge persisted token: {}", e);
        }
        self.store
            .set(Session::errored("Session expired. Please login again."));
    }

    fn fail_login(&self, error: AppError) -> Result<(), AppError> {
        self.store.set(Session::errored(error.user_message()));
        Err(error)
    }
}
