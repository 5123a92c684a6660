//! Session cookie helpers.
//!
//! Moves session tokens between `SessionToken` values and HTTP headers. Cookie
//! security attributes (`Secure`, `HttpOnly`, `Domain`) are left to the
//! deployment.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use super::AuthError;
use super::session::SessionToken;

/// A session cookie ready to be attached to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub path: &'static str,
    /// Lifetime in seconds, rendered as `Max-Age`.
    pub max_age: i64,
    /// Unix time in seconds at which the cookie expires.
    pub expires_at: i64,
}

impl SessionCookie {
    /// Wrap an encoded session token issued at `now`.
    #[must_use]
    pub fn new(name: impl Into<String>, token: SessionToken, now: i64) -> Self {
        Self {
            name: name.into(),
            value: token.value,
            path: "/",
            max_age: token.expires_at.saturating_sub(now).max(0),
            expires_at: token.expires_at,
        }
    }

    /// Render the `Set-Cookie` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Path={}; Max-Age={}",
            self.name, self.value, self.path, self.max_age
        )
    }
}

/// Append a `Set-Cookie` header for `cookie`.
///
/// # Errors
/// Returns `MalformedToken` if the cookie contains bytes not allowed in a header.
pub fn set_cookie(headers: &mut HeaderMap, cookie: &SessionCookie) -> Result<(), AuthError> {
    let value = HeaderValue::from_str(&cookie.header_value())
        .map_err(|e| AuthError::MalformedToken(format!("invalid cookie header: {e}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

/// Extract the value of the cookie called `name` from request headers.
///
/// Every `Cookie` header is searched; the first match wins.
///
/// # Errors
/// Returns `MissingCookie` if no such cookie is present.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Result<String, AuthError> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.trim().to_string())
        })
        .ok_or_else(|| AuthError::MissingCookie(name.to_string()))
}
