//! Session token codec.
//!
//! A session token is the assertion's fields as a compact JSON object,
//! percent-escaped so it can be stored as a cookie value.
//!
//! # Post-conditions
//! - `decode(&encode(fields, ttl, now).value) == Ok(fields)`.
//!
//! # Invariants
//! - The token carries no signature of its own. Decoded fields must go through
//!   `verify` again before they are trusted; anyone who can write the cookie
//!   can hand the server arbitrary fields.
//! - The expiry instant lives beside the token, not inside it.
//! - Every `%` must start a two-digit hex escape. `+` is kept as a literal
//!   plus, not decoded to a space; `encode` never emits either form raw, so
//!   this only affects hand-written cookies.

use std::time::Duration;

use super::AuthError;
use super::fields::IdentityFields;

/// An encoded session plus the instant it should stop being presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Opaque, percent-escaped token value.
    pub value: String,
    /// Unix time in seconds after which the cookie holding this token expires.
    pub expires_at: i64,
}

/// Encode `fields` into a session token valid for `ttl` from `now`.
#[must_use]
pub fn encode(fields: &IdentityFields, ttl: Duration, now: i64) -> SessionToken {
    // A map of strings always serializes.
    #[allow(clippy::expect_used)]
    let json = serde_json::to_string(fields).expect("string map serializes to JSON");
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

    SessionToken {
        value: urlencoding::encode(&json).into_owned(),
        expires_at: now.saturating_add(ttl_secs),
    }
}

/// Decode a token produced by `encode`.
///
/// Performs no cryptographic validation.
///
/// # Errors
/// Returns `MalformedToken` if the value cannot be unescaped or is not a JSON
/// object of strings.
pub fn decode(token: &str) -> Result<IdentityFields, AuthError> {
    check_escapes(token)?;
    let json = urlencoding::decode(token)
        .map_err(|e| AuthError::MalformedToken(format!("error unescaping token: {e}")))?;

    serde_json::from_str(&json)
        .map_err(|e| AuthError::MalformedToken(format!("error parsing token: {e}")))
}

/// Reject any `%` not followed by two hex digits.
fn check_escapes(token: &str) -> Result<(), AuthError> {
    let bytes = token.as_bytes();
    let mut start = 0;
    while let Some(offset) = bytes[start..].iter().position(|&b| b == b'%') {
        let at = start + offset;
        let valid = bytes
            .get(at + 1..at + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(AuthError::MalformedToken(format!(
                "invalid percent-escape at byte {at}"
            )));
        }
        start = at + 3;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn sample_fields() -> IdentityFields {
        IdentityFields::from([
            ("id", "123"),
            ("first_name", "John"),
            ("username", "john"),
            ("photo_url", "http://example.com/photo.jpg"),
            ("auth_date", "1234567890"),
            ("hash", "1234567890"),
        ])
    }

    #[test]
    fn test_round_trip() {
        let fields = sample_fields();
        let token = encode(&fields, DAY, NOW);
        assert_eq!(decode(&token.value), Ok(fields));
    }

    #[test]
    fn test_round_trip_awkward_values() {
        let fields = IdentityFields::from([
            ("first_name", "Jöhn \"the\" O'Neil"),
            ("last_name", "a;b=c&d%20e+f"),
            ("emoji", "🦀 crab"),
            ("empty", ""),
        ]);
        let token = encode(&fields, DAY, NOW);
        assert_eq!(decode(&token.value), Ok(fields));
    }

    #[test]
    fn test_round_trip_empty() {
        let fields = IdentityFields::new();
        let token = encode(&fields, DAY, NOW);
        assert_eq!(token.value, "%7B%7D");
        assert_eq!(decode(&token.value), Ok(fields));
    }

    #[test]
    fn test_token_is_cookie_safe() {
        let token = encode(&sample_fields(), DAY, NOW);
        assert!(
            token
                .value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'%' | b'-' | b'_' | b'.' | b'~'))
        );
    }

    #[test]
    fn test_token_is_deterministic() {
        let a = encode(&sample_fields(), DAY, NOW);
        let b = encode(&sample_fields(), DAY, NOW);
        assert_eq!(a, b);
    }

    #[test]
    fn test_expiry_is_metadata() {
        let short = encode(&sample_fields(), Duration::from_secs(60), NOW);
        let long = encode(&sample_fields(), DAY, NOW);

        assert_eq!(short.expires_at, NOW + 60);
        assert_eq!(long.expires_at, NOW + 86_400);
        assert_eq!(short.value, long.value);
    }

    #[test]
    fn test_decode_not_json() {
        let result = decode("hello%20world");
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let result = decode("%FF%FE");
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_invalid_escape() {
        for token in [
            "%7B%22id%22%3A%22%ZZ%22%7D",
            r#"{"a":"100%"}"#,
            "%7B%7D%",
            "%7",
            "%7B%7D%7",
        ] {
            let result = decode(token);
            assert!(
                matches!(result, Err(AuthError::MalformedToken(ref reason)) if reason.starts_with("invalid percent-escape")),
                "token {token:?}: {result:?}"
            );
        }
    }

    #[test]
    fn test_decode_keeps_plus_literal() {
        let result = decode("%7B%22name%22%3A%22a+b%22%7D").expect("valid token");
        assert_eq!(result.get("name"), Some("a+b"));
    }

    #[test]
    fn test_decode_wrong_json_shape() {
        for token in ["%5B%5D", "%7B%22id%22%3A123%7D", "null", ""] {
            let result = decode(token);
            assert!(
                matches!(result, Err(AuthError::MalformedToken(_))),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_decode_accepts_unescaped_json() {
        // Only the outer channel protects the token; a hand-written cookie decodes fine.
        let result = decode(r#"{"id":"1","username":"mallory"}"#).expect("plain JSON decodes");
        assert_eq!(result.get("username"), Some("mallory"));
    }
}
