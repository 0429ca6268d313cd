//! Incoming push message payloads and their parsed form.

use serde::Deserialize;

/// Raw push payload as delivered by the messaging transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: Option<PushNotification>,
    #[serde(default)]
    pub data: Option<PushData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushNotification {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushData {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Message category for UI presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Alert,
    Update,
}

/// A push message parsed into displayable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
}

impl NotificationEvent {
    /// Parse a raw payload. Messages without both a title and a body are
    /// dropped (`None`). The kind is `Alert` only when the payload
    /// explicitly marks it so.
    pub fn from_payload(payload: PushPayload) -> Option<Self> {
        let notification = payload.notification?;
        let title = notification.title?;
        let body = notification.body?;

        let kind = match payload.data.and_then(|d| d.kind) {
            Some(kind) if kind == "alert" => NotificationKind::Alert,
            _ => NotificationKind::Update,
        };

        Some(Self { title, body, kind })
    }
}
