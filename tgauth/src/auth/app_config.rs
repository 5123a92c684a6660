//! Authentication configuration.
//!
//! # Pre-conditions
//! - The bot token must be a valid, non-empty string.
//!
//! # Post-conditions
//! - `AuthConfig` instances are immutable once created; the `with_*` methods
//!   consume the value and return a new one.
//!
//! # Invariants
//! - The bot token is never empty.
//! - The cookie name is a non-empty cookie token (visible ASCII, no separators).
//! - The bot token is never printed by `Debug`.

use std::time::Duration;

use super::verifier::Diagnostics;

/// Error returned when authentication configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The bot token is empty.
    EmptySecret,
    /// The cookie name is empty.
    EmptyCookieName,
    /// The cookie name contains characters not allowed in a cookie token.
    InvalidCookieName(String),
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "bot token must not be empty"),
            Self::EmptyCookieName => write!(f, "cookie name must not be empty"),
            Self::InvalidCookieName(name) => write!(
                f,
                "invalid cookie name '{name}': only visible ASCII without separators is allowed"
            ),
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The issuer's shared secret (the Telegram bot token).
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap a bot token.
    ///
    /// # Errors
    /// Returns `ConfigError::EmptySecret` if the token is empty.
    pub fn new(token: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = token.into();
        if bytes.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self(bytes))
    }

    /// Raw secret bytes. Callers must not log these.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Configuration for verifying assertions and issuing session cookies.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    bot_token: Secret,
    cookie_name: String,
    max_age: Duration,
    session_ttl: Duration,
    diagnostics: Diagnostics,
}

impl AuthConfig {
    /// Default session cookie name.
    pub const DEFAULT_COOKIE_NAME: &'static str = "tg_auth";
    /// Default freshness window for `auth_date`.
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
    /// Default lifetime of the session cookie.
    pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Create a configuration with defaults for everything but the secret.
    ///
    /// # Errors
    /// Returns `ConfigError::EmptySecret` if the token is empty.
    pub fn new(bot_token: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: Secret::new(bot_token)?,
            cookie_name: Self::DEFAULT_COOKIE_NAME.to_string(),
            max_age: Self::DEFAULT_MAX_AGE,
            session_ttl: Self::DEFAULT_SESSION_TTL,
            diagnostics: Diagnostics::Quiet,
        })
    }

    /// Use a different session cookie name.
    ///
    /// # Errors
    /// - `ConfigError::EmptyCookieName` if the name is empty.
    /// - `ConfigError::InvalidCookieName` if the name is not a cookie token.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyCookieName);
        }
        if !name.bytes().all(is_cookie_token_byte) {
            return Err(ConfigError::InvalidCookieName(name));
        }
        self.cookie_name = name;
        Ok(self)
    }

    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    #[must_use]
    pub const fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub const fn bot_token(&self) -> &Secret {
        &self.bot_token
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    #[must_use]
    pub const fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TGAUTH_BOT_TOKEN`: Bot token (required)
    /// - `TGAUTH_COOKIE_NAME`: Session cookie name (default: `tg_auth`)
    /// - `TGAUTH_MAX_AGE_SECS`: Freshness window in seconds (default: `86400`)
    /// - `TGAUTH_SESSION_TTL_SECS`: Cookie lifetime in seconds (default: `86400`)
    /// - `TGAUTH_DEBUG`: `true`/`1` enables diagnostic logging (default: off)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TGAUTH_BOT_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("TGAUTH_BOT_TOKEN".to_string()))?;
        let mut config = Self::new(token)?;

        if let Some(name) = lookup("TGAUTH_COOKIE_NAME") {
            config = config.with_cookie_name(name)?;
        }
        if let Some(value) = lookup("TGAUTH_MAX_AGE_SECS") {
            config = config.with_max_age(parse_secs("TGAUTH_MAX_AGE_SECS", &value)?);
        }
        if let Some(value) = lookup("TGAUTH_SESSION_TTL_SECS") {
            config = config.with_session_ttl(parse_secs("TGAUTH_SESSION_TTL_SECS", &value)?);
        }
        if let Some(value) = lookup("TGAUTH_DEBUG") {
            config = config.with_diagnostics(parse_debug_flag(&value)?);
        }

        Ok(config)
    }
}

/// RFC 6265 cookie-name token: visible ASCII except separators.
const fn is_cookie_token_byte(b: u8) -> bool {
    b.is_ascii_graphic()
        && !matches!(
            b,
            b'(' | b')'
                | b'<'
                | b'>'
                | b'@'
                | b','
                | b';'
                | b':'
                | b'\\'
                | b'"'
                | b'/'
                | b'['
                | b']'
                | b'?'
                | b'='
                | b'{'
                | b'}'
        )
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a whole number of seconds"),
        })
}

fn parse_debug_flag(value: &str) -> Result<Diagnostics, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Diagnostics::Verbose),
        "0" | "false" | "no" | "off" | "" => Ok(Diagnostics::Quiet),
        _ => Err(ConfigError::InvalidValue {
            name: "TGAUTH_DEBUG".to_string(),
            message: format!("'{value}' is not a boolean"),
        }),
    }
}
