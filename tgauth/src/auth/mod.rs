//! Telegram Login Widget authentication.
//!
//! This module verifies identity assertions signed with a bot token and keeps
//! the verified fields in a client-side session cookie.
//!
//! # Pre-conditions
//! - The deploying application is configured with the bot token used by its
//!   login widget.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - The bot token is non-empty and never logged.
//! - Session cookies are not self-authenticating: decoded fields are verified
//!   again on every request.

pub mod app_config;
pub mod cookie;
mod error;
pub mod fields;
pub mod identity;
pub mod provider;
pub mod session;
pub mod verifier;

pub use app_config::{AuthConfig, ConfigError, Secret};
pub use cookie::SessionCookie;
pub use error::AuthError;
pub use fields::IdentityFields;
pub use identity::{VerifiedIdentity, project};
pub use provider::{TelegramAuth, TelegramAuthenticator};
pub use session::{SessionToken, decode, encode};
pub use verifier::{Diagnostics, canonicalize, compute_hash, verify};
