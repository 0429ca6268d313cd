//! Push-token acquisition and device registration.
//!
//! Runs once at process start on platforms with foreground push
//! delivery (the composition root decides whether to construct one).
//! Registration with the backend happens only when both a device token
//! and a session token exist, at most once per process run; failures on
//! this path are logged and swallowed, never propagated into session or
//! weather state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use skycast_core::error::AppError;
use skycast_core::storage::{keys, KeyValueStore};
use skycast_session::{AuthClient, SessionStore};

use crate::message::{NotificationEvent, PushPayload};

/// Capability interface over the platform push transport.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Ask for notification permission. `false` means denied.
    async fn request_permission(&self) -> Result<bool, AppError>;

    /// Obtain a device push token, if the platform can supply one.
    async fn acquire_token(&self) -> Result<Option<String>, AppError>;
}

type Subscriber = Box<dyn Fn(&NotificationEvent) + Send + Sync>;

pub struct NotificationRegistrar {
    provider: Arc<dyn PushProvider>,
    auth: AuthClient,
    session: SessionStore,
    kv: Arc<dyn KeyValueStore>,
    initialized: AtomicBool,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl NotificationRegistrar {
    pub fn new(
        provider: Arc<dyn PushProvider>,
        auth: AuthClient,
        session: SessionStore,
        kv: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            provider,
            auth,
            session,
            kv,
            initialized: AtomicBool::new(false),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Set up the push pipeline. Idempotent: repeat calls return
    /// immediately. Permission denial and registration failures are
    /// non-fatal.
    pub async fn initialize(&self) -> Result<(), AppError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!("Notification registrar already initialized");
            return Ok(());
        }

        let granted = self.provider.request_permission().await?;
        if !granted {
            tracing::warn!("Notification permission not granted");
            return Ok(());
        }

        let Some(device_token) = self.provider.acquire_token().await? else {
            tracing::warn!("No push token available from provider");
            return Ok(());
        };

        if let Err(e) = self.kv.set(keys::PUSH_TOKEN, &device_token) {
            tracing::warn!("Failed to persist push token: {}", e);
        }

        // Register only when a session exists. No retry, no dedup
        // across restarts; at most one attempt per process run.
        match self.session.token() {
            Some(session_token) => {
                match self.auth.register_device(&device_token, &session_token).await {
                    Ok(()) => tracing::info!("Device token registered with backend"),
                    Err(e) => tracing::warn!("Device registration failed: {}", e),
                }
            }
            None => {
                tracing::debug!("No session token; skipping device registration");
            }
        }

        Ok(())
    }

    /// Add a subscriber for incoming foreground messages.
    pub fn subscribe(&self, subscriber: impl Fn(&NotificationEvent) + Send + Sync + 'static) {
        self.subscribers.write().push(Box::new(subscriber));
    }

    /// Deliver a raw foreground payload to subscribers. Incomplete
    /// payloads are dropped; so are events arriving with no subscribers
    /// registered (no queueing).
    pub fn handle_message(&self, payload: PushPayload) {
        let Some(event) = NotificationEvent::from_payload(payload) else {
            tracing::debug!("Dropping push message without title/body");
            return;
        };

        let subscribers = self.subscribers.read();
        if subscribers.is_empty() {
            tracing::debug!("Dropping push message; no subscribers registered");
            return;
        }

        for subscriber in subscribers.iter() {
            subscriber(&event);
        }
    }
}
