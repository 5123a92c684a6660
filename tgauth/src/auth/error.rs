//! Errors returned by verification, projection and the session codec.
//!
//! Every variant is a per-request rejection. None of them are retried and none
//! are fatal to the process; the caller decides whether to redirect to the
//! login page or return an error response.

/// Error returned when an identity assertion or session cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A field required by verification is absent.
    MissingField(&'static str),
    /// The recomputed signature does not match the `hash` field.
    HashMismatch,
    /// `auth_date` is absent or not a base-10 integer.
    InvalidTimestamp(String),
    /// `auth_date` is older than the freshness window allows.
    Expired {
        /// The assertion's `auth_date`.
        auth_date: i64,
        /// The oldest `auth_date` that would still have been accepted.
        oldest_accepted: i64,
    },
    /// The session token could not be unescaped or parsed.
    MalformedToken(String),
    /// `id` is absent or not numeric.
    MissingId,
    /// Neither `username` nor `first_name` is present.
    MissingDisplayName,
    /// The request carries no session cookie with the given name.
    MissingCookie(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "missing '{name}' field"),
            Self::HashMismatch => write!(f, "hash mismatch"),
            Self::InvalidTimestamp(value) => write!(f, "invalid auth_date: '{value}'"),
            Self::Expired {
                auth_date,
                oldest_accepted,
            } => write!(
                f,
                "assertion expired: auth_date {auth_date} is older than {oldest_accepted}"
            ),
            Self::MalformedToken(reason) => write!(f, "malformed session token: {reason}"),
            Self::MissingId => write!(f, "missing or non-numeric 'id' field"),
            Self::MissingDisplayName => {
                write!(f, "missing display name: neither 'username' nor 'first_name' present")
            }
            Self::MissingCookie(name) => write!(f, "no '{name}' cookie on request"),
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::MissingField("hash").to_string(),
            "missing 'hash' field"
        );
        assert_eq!(AuthError::HashMismatch.to_string(), "hash mismatch");
        assert_eq!(
            AuthError::InvalidTimestamp("yesterday".to_string()).to_string(),
            "invalid auth_date: 'yesterday'"
        );
        assert_eq!(
            AuthError::Expired {
                auth_date: 10,
                oldest_accepted: 20
            }
            .to_string(),
            "assertion expired: auth_date 10 is older than 20"
        );
        assert_eq!(
            AuthError::MalformedToken("bad json".to_string()).to_string(),
            "malformed session token: bad json"
        );
        assert_eq!(
            AuthError::MissingId.to_string(),
            "missing or non-numeric 'id' field"
        );
        assert_eq!(
            AuthError::MissingCookie("tg_auth".to_string()).to_string(),
            "no 'tg_auth' cookie on request"
        );
    }
}
