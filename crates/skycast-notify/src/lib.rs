//! Push notifications for SkyCast
//!
//! Acquires a device push token, pairs it with the authenticated
//! session on the backend, and dispatches incoming foreground messages
//! to typed subscribers.

pub mod message;
pub mod registrar;

pub use message::{NotificationEvent, NotificationKind, PushData, PushNotification, PushPayload};
pub use registrar::{NotificationRegistrar, PushProvider};
