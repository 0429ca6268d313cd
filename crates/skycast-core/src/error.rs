//! Centralized error types for the SkyCast client core.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the SkyCast core should be convertible to this type.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(e) => e.user_message(),
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Api(e) => e.user_message(),
            AppError::Permission(e) => e.user_message().to_string(),
            AppError::Validation(e) => e.user_message(),
            AppError::Storage(_) => "A local data operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Authentication errors (credentials, tokens, session lifecycle).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::LoginFailed(msg) => msg.clone(),
            AuthError::RegistrationFailed(msg) => msg.clone(),
            AuthError::SessionExpired => "Session expired. Please login again.".to_string(),
            AuthError::NotAuthenticated => "Please login to continue.".to_string(),
        }
    }
}

/// Network-related errors (HTTP transport, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Backend API errors (non-2xx responses with a backend-supplied detail).
#[derive(Debug, Error)]
#[error("API error ({status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn user_message(&self) -> String {
        self.message.clone()
    }
}

/// Permission errors (location/notification access denied).
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Location permission denied")]
    LocationDenied,

    #[error("Notification permission denied")]
    NotificationDenied,
}

impl PermissionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PermissionError::LocationDenied => {
                "Location permission is required to use this feature"
            }
            PermissionError::NotificationDenied => {
                "Notification permission is required to receive alerts"
            }
        }
    }
}

/// Validation errors (empty required input, malformed payloads).
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::EmptyField(field) => format!("Please enter a {}.", field),
            ValidationError::MissingField(_) | ValidationError::Malformed(_) => {
                "Received malformed data from the server.".to_string()
            }
        }
    }
}

/// Local key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
