//! The `TelegramAuth` capability and its production implementation.
//!
//! Request handlers depend on `dyn TelegramAuth` so tests can inject
//! [`FakeTelegramAuth`](crate::testing::FakeTelegramAuth) instead.

use axum::http::HeaderMap;

use super::cookie::{self, SessionCookie};
use super::fields::IdentityFields;
use super::identity::{self, VerifiedIdentity};
use super::{AuthConfig, AuthError, session, verifier};
use crate::time::{SystemTimeSource, TimeSource};

/// Verifies login assertions and moves them in and out of session cookies.
pub trait TelegramAuth: Send + Sync {
    /// Check that `fields` were signed by the configured bot and are fresh.
    fn check_auth(&self, fields: &IdentityFields) -> Result<(), AuthError>;

    /// Project checked fields into a typed identity.
    fn user_info(&self, fields: &IdentityFields) -> Result<VerifiedIdentity, AuthError>;

    /// Read and decode the session cookie from request headers.
    fn params_from_cookie(&self, headers: &HeaderMap) -> Result<IdentityFields, AuthError>;

    /// Decode a session cookie value obtained by the caller.
    fn params_from_cookie_value(&self, value: &str) -> Result<IdentityFields, AuthError>;

    /// Build a session cookie the caller can attach itself.
    fn create_cookie(&self, fields: &IdentityFields) -> SessionCookie;

    /// Encode `fields` and attach the session cookie to response headers.
    fn set_cookie(&self, headers: &mut HeaderMap, fields: &IdentityFields)
    -> Result<(), AuthError>;

    /// Name of the session cookie.
    fn cookie_name(&self) -> &str;

    /// Session cookie value for `fields`.
    fn cookie_value(&self, fields: &IdentityFields) -> String {
        self.create_cookie(fields).value
    }
}

/// Production `TelegramAuth` backed by an `AuthConfig` and a clock.
#[derive(Debug, Clone)]
pub struct TelegramAuthenticator<T = SystemTimeSource> {
    config: AuthConfig,
    clock: T,
}

impl TelegramAuthenticator<SystemTimeSource> {
    /// Create an authenticator that reads the system clock.
    #[must_use]
    pub const fn new(config: AuthConfig) -> Self {
        Self {
            config,
            clock: SystemTimeSource,
        }
    }
}

impl<T: TimeSource> TelegramAuthenticator<T> {
    /// Create an authenticator with an explicit clock.
    #[must_use]
    pub const fn with_clock(config: AuthConfig, clock: T) -> Self {
        Self { config, clock }
    }
}

impl<T: TimeSource> TelegramAuth for TelegramAuthenticator<T> {
    fn check_auth(&self, fields: &IdentityFields) -> Result<(), AuthError> {
        verifier::verify(
            fields,
            self.config.bot_token(),
            self.clock.now_secs(),
            self.config.max_age(),
            self.config.diagnostics(),
        )
    }

    fn user_info(&self, fields: &IdentityFields) -> Result<VerifiedIdentity, AuthError> {
        identity::project(fields)
    }

    fn params_from_cookie(&self, headers: &HeaderMap) -> Result<IdentityFields, AuthError> {
        let value = cookie::extract_cookie(headers, self.config.cookie_name())?;
        self.params_from_cookie_value(&value)
    }

    fn params_from_cookie_value(&self, value: &str) -> Result<IdentityFields, AuthError> {
        session::decode(value)
    }

    fn create_cookie(&self, fields: &IdentityFields) -> SessionCookie {
        let now = self.clock.now_secs();
        let token = session::encode(fields, self.config.session_ttl(), now);
        SessionCookie::new(self.config.cookie_name(), token, now)
    }

    fn set_cookie(
        &self,
        headers: &mut HeaderMap,
        fields: &IdentityFields,
    ) -> Result<(), AuthError> {
        cookie::set_cookie(headers, &self.create_cookie(fields))
    }

    fn cookie_name(&self) -> &str {
        self.config.cookie_name()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;
    use axum::http::header::{COOKIE, SET_COOKIE};

    use super::*;
    use crate::auth::compute_hash;
    use crate::time::FixedTimeSource;

    const AUTH_DATE: i64 = 1_234_567_890;

    fn authenticator(now: i64) -> TelegramAuthenticator<FixedTimeSource> {
        let config = AuthConfig::new("bot_token").expect("valid token");
        TelegramAuthenticator::with_clock(config, FixedTimeSource::new(now))
    }

    fn signed_fields() -> IdentityFields {
        let mut fields = IdentityFields::from([
            ("id", "123"),
            ("first_name", "John"),
            ("username", "john"),
            ("photo_url", "http://example.com/photo.jpg"),
            ("auth_date", "1234567890"),
        ]);
        let secret = AuthConfig::new("bot_token").expect("valid token");
        let hash = compute_hash(&fields, secret.bot_token());
        fields.insert("hash", hash);
        fields
    }

    #[test]
    fn test_check_auth_uses_clock() {
        assert!(authenticator(AUTH_DATE + 10).check_auth(&signed_fields()).is_ok());
        assert!(matches!(
            authenticator(AUTH_DATE + 4 * 86_400).check_auth(&signed_fields()),
            Err(AuthError::Expired { .. })
        ));
    }

    #[test]
    fn test_create_cookie_uses_config() {
        let config = AuthConfig::new("bot_token")
            .expect("valid token")
            .with_cookie_name("session")
            .expect("valid name")
            .with_session_ttl(Duration::from_secs(600));
        let auth = TelegramAuthenticator::with_clock(config, FixedTimeSource::new(AUTH_DATE));

        let cookie = auth.create_cookie(&signed_fields());
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.max_age, 600);
        assert_eq!(cookie.expires_at, AUTH_DATE + 600);
        assert_eq!(auth.cookie_name(), "session");
    }

    #[test]
    fn test_set_cookie_then_params_from_cookie() {
        let auth = authenticator(AUTH_DATE);
        let fields = signed_fields();

        let mut response_headers = HeaderMap::new();
        auth.set_cookie(&mut response_headers, &fields)
            .expect("cookie attaches");
        let set_cookie = response_headers
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("Set-Cookie present");

        // A browser sends back only the name=value pair.
        let pair = set_cookie.split(';').next().expect("name=value pair");
        let mut request_headers = HeaderMap::new();
        request_headers.insert(COOKIE, HeaderValue::from_str(pair).expect("valid header"));

        let decoded = auth
            .params_from_cookie(&request_headers)
            .expect("cookie decodes");
        assert_eq!(decoded, fields);
        assert_eq!(auth.cookie_value(&fields), pair.trim_start_matches("tg_auth="));
    }

    #[test]
    fn test_params_from_cookie_missing() {
        let auth = authenticator(AUTH_DATE);
        let result = auth.params_from_cookie(&HeaderMap::new());
        assert_eq!(result, Err(AuthError::MissingCookie("tg_auth".to_string())));
    }

    #[test]
    fn test_user_info() {
        let auth = authenticator(AUTH_DATE);
        let identity = auth.user_info(&signed_fields()).expect("valid identity");
        assert_eq!(identity.id, 123);
        assert_eq!(identity.username, "john");
    }

    #[test]
    fn test_usable_as_trait_object() {
        let auth: Box<dyn TelegramAuth> = Box::new(authenticator(AUTH_DATE));
        assert!(auth.check_auth(&signed_fields()).is_ok());
    }
}
