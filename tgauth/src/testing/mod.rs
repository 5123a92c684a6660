//! Test doubles for code that depends on `TelegramAuth`.

use axum::http::HeaderMap;

use crate::auth::{
    AuthError, IdentityFields, SessionCookie, SessionToken, TelegramAuth, VerifiedIdentity,
};

/// Hash of [`fixture_fields`] signed with the bot token `bot_token`.
pub const FIXTURE_HASH: &str = "da26696b03d7e7d67ebe4388fa133425b588b16fc40210e8656fb648eadecd0f";

/// A signed assertion for user `john` dated `1234567890`.
#[must_use]
pub fn fixture_fields() -> IdentityFields {
    IdentityFields::from([
        ("id", "123"),
        ("first_name", "John"),
        ("username", "john"),
        ("photo_url", "http://example.com/photo.jpg"),
        ("auth_date", "1234567890"),
        ("hash", FIXTURE_HASH),
    ])
}

/// Deterministic `TelegramAuth` with a fixed verdict.
///
/// `check_auth` ignores its input and either always succeeds or always fails
/// with `HashMismatch`. Cookies are never written; reading one always yields
/// [`fixture_fields`].
#[derive(Debug, Clone)]
pub struct FakeTelegramAuth {
    pass: bool,
    username: String,
}

impl FakeTelegramAuth {
    #[must_use]
    pub fn new(pass: bool, username: impl Into<String>) -> Self {
        Self {
            pass,
            username: username.into(),
        }
    }
}

impl TelegramAuth for FakeTelegramAuth {
    fn check_auth(&self, _fields: &IdentityFields) -> Result<(), AuthError> {
        if self.pass {
            Ok(())
        } else {
            Err(AuthError::HashMismatch)
        }
    }

    fn user_info(&self, _fields: &IdentityFields) -> Result<VerifiedIdentity, AuthError> {
        Ok(VerifiedIdentity {
            id: 0,
            username: self.username.clone(),
            first_name: Some(self.username.clone()),
            last_name: None,
            photo_url: Some(
                "https://www.google.com/s2/favicons?domain=google.com&sz=64".to_string(),
            ),
        })
    }

    fn params_from_cookie(&self, _headers: &HeaderMap) -> Result<IdentityFields, AuthError> {
        Ok(fixture_fields())
    }

    fn params_from_cookie_value(&self, _value: &str) -> Result<IdentityFields, AuthError> {
        Ok(fixture_fields())
    }

    fn create_cookie(&self, _fields: &IdentityFields) -> SessionCookie {
        SessionCookie::new(
            self.cookie_name(),
            SessionToken {
                value: String::new(),
                expires_at: 0,
            },
            0,
        )
    }

    fn set_cookie(
        &self,
        _headers: &mut HeaderMap,
        _fields: &IdentityFields,
    ) -> Result<(), AuthError> {
        Ok(())
    }

    fn cookie_name(&self) -> &str {
        "tg_auth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_check_auth() {
        let auth = FakeTelegramAuth::new(true, "alice");
        assert!(auth.check_auth(&IdentityFields::new()).is_ok());

        let auth = FakeTelegramAuth::new(false, "alice");
        assert_eq!(
            auth.check_auth(&IdentityFields::new()),
            Err(AuthError::HashMismatch)
        );
    }

    #[test]
    fn test_fake_user_info() {
        let auth = FakeTelegramAuth::new(true, "alice");
        let identity = auth.user_info(&IdentityFields::new()).expect("fake identity");
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.first_name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_fake_set_cookie_is_noop() {
        let auth = FakeTelegramAuth::new(true, "alice");
        let mut headers = HeaderMap::new();
        auth.set_cookie(&mut headers, &fixture_fields())
            .expect("noop succeeds");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_fake_cookie_yields_fixture() {
        let auth = FakeTelegramAuth::new(true, "alice");
        assert_eq!(auth.params_from_cookie(&HeaderMap::new()), Ok(fixture_fields()));
        assert_eq!(auth.params_from_cookie_value("junk"), Ok(fixture_fields()));
    }
}
