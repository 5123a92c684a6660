//! Demo server configuration.
//!
//! This module loads the settings the demo binary needs on top of
//! [`AuthConfig`](crate::auth::AuthConfig) from environment variables.
//!
//! # Environment Variables
//!
//! - `TGAUTH_BOT_NAME`: Bot username shown by the login widget (required)
//! - `TGAUTH_DOMAIN`: Host the widget redirects back to (default: `localhost:8080`)
//! - `TGAUTH_LISTEN_PORT`: Port to listen on (default: `8080`)
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number (1-65535)
//! - `bot_name` is never empty

use crate::auth::ConfigError;

/// Demo server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bot username embedded in the login widget.
    pub bot_name: String,
    /// Host (and optional port) the widget's `data-auth-url` points at.
    pub domain: String,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default public domain.
    pub const DEFAULT_DOMAIN: &'static str = "localhost:8080";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TGAUTH_BOT_NAME` is not set or is empty
    /// - `TGAUTH_LISTEN_PORT` is set but not a valid port number
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_name = lookup("TGAUTH_BOT_NAME")
            .ok_or_else(|| ConfigError::MissingEnvVar("TGAUTH_BOT_NAME".to_string()))?;
        if bot_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "TGAUTH_BOT_NAME".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let domain = lookup("TGAUTH_DOMAIN").unwrap_or_else(|| Self::DEFAULT_DOMAIN.to_string());

        let listen_port = match lookup("TGAUTH_LISTEN_PORT") {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "TGAUTH_LISTEN_PORT".to_string(),
                        message: format!("'{value}' is not a valid port number (must be 1-65535)"),
                    });
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Ok(Self {
            bot_name,
            domain,
            listen_port,
        })
    }
}
