//! Session management for SkyCast
//!
//! Owns the authentication state machine: credential exchange, account
//! registration, logout, cold-start token validation, and the shared
//! session store read by the other service crates.

pub mod client;
pub mod manager;
pub mod session;

pub use client::{AuthClient, TokenResponse};
pub use manager::SessionManager;
pub use session::{Session, SessionStore, UserRef};
