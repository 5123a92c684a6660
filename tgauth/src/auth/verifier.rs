//! Assertion verification.
//!
//! Recomputes the issuer's signature over an assertion and checks that the
//! assertion is fresh.
//!
//! # Pre-conditions
//! - The secret is the bot token the login widget was configured with.
//!
//! # Post-conditions
//! - On success, the fields were signed with the secret and `auth_date` lies
//!   inside the freshness window.
//! - On failure, returns the first check that failed.
//!
//! # Invariants
//! - The `hash` field never takes part in canonicalization.
//! - The secret is never logged.
//! - Verification is stateless and the same inputs always produce the same
//!   outputs.

use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::AuthError;
use super::app_config::Secret;
use super::fields::{AUTH_DATE_FIELD, HASH_FIELD, IdentityFields};

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 tag.
const HASH_HEX_LEN: usize = 64;

/// Whether verification emits diagnostic logs.
///
/// Passed to each call rather than stored on a shared value, so concurrent
/// callers can pick different settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Diagnostics {
    #[default]
    Quiet,
    /// Log the computed hash, the parsed `auth_date` and the outcome at debug level.
    Verbose,
}

impl Diagnostics {
    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Build the data-check string the issuer signs.
///
/// Every field except `hash` becomes `key=value`; the strings are sorted
/// byte-wise and joined with `\n`.
#[must_use]
pub fn canonicalize(fields: &IdentityFields) -> String {
    // Sort the joined strings, not the keys: "a0=.." sorts before "a=..".
    let mut lines: Vec<String> = fields
        .iter()
        .filter(|(key, _)| *key != HASH_FIELD)
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

/// Compute the lowercase hex signature the issuer would attach to `fields`.
#[must_use]
pub fn compute_hash(fields: &IdentityFields, secret: &Secret) -> String {
    let mac = signing_mac(&canonicalize(fields), secret);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify an identity assertion.
///
/// # Arguments
/// * `fields` - The assertion fields, including `hash` and `auth_date`.
/// * `secret` - The bot token.
/// * `now` - Current Unix time in seconds.
/// * `max_age` - Oldest acceptable age of `auth_date`.
/// * `diagnostics` - Whether to emit debug logs for this call.
///
/// # Errors
/// - `MissingField` if `hash` is absent.
/// - `HashMismatch` if `hash` is not the signature of the other fields.
/// - `InvalidTimestamp` if `auth_date` is absent or not an integer.
/// - `Expired` if `auth_date < now - max_age`. Future dates are accepted.
pub fn verify(
    fields: &IdentityFields,
    secret: &Secret,
    now: i64,
    max_age: Duration,
    diagnostics: Diagnostics,
) -> Result<(), AuthError> {
    let mac = signing_mac(&canonicalize(fields), secret);

    if diagnostics.is_verbose() {
        let computed = hex::encode(mac.clone().finalize().into_bytes());
        tracing::debug!(computed_hash = %computed, "calculated assertion hash");
    }

    let Some(provided) = fields.get(HASH_FIELD) else {
        if diagnostics.is_verbose() {
            tracing::debug!("assertion has no hash field");
        }
        return Err(AuthError::MissingField(HASH_FIELD));
    };

    if !tag_matches(mac, provided) {
        if diagnostics.is_verbose() {
            tracing::debug!(provided_hash = %provided, "hash mismatch");
        }
        return Err(AuthError::HashMismatch);
    }

    let raw_date = fields.get(AUTH_DATE_FIELD).unwrap_or_default();
    let auth_date = raw_date.parse::<i64>().map_err(|_| {
        if diagnostics.is_verbose() {
            tracing::debug!(auth_date = %raw_date, "unparseable auth_date");
        }
        AuthError::InvalidTimestamp(raw_date.to_string())
    })?;

    if diagnostics.is_verbose() {
        tracing::debug!(auth_date, now, "parsed auth_date");
    }

    let max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
    let oldest_accepted = now.saturating_sub(max_age_secs);
    if auth_date < oldest_accepted {
        if diagnostics.is_verbose() {
            tracing::debug!(auth_date, oldest_accepted, "assertion expired");
        }
        return Err(AuthError::Expired {
            auth_date,
            oldest_accepted,
        });
    }

    if diagnostics.is_verbose() {
        tracing::debug!("assertion verified");
    }
    Ok(())
}

/// HMAC keyed with SHA-256(secret), already fed the canonical string.
fn signing_mac(canonical: &str, secret: &Secret) -> HmacSha256 {
    let key = Sha256::digest(secret.expose());
    // HMAC accepts keys of any length.
    #[allow(clippy::expect_used)]
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(&key).expect("HMAC can take key of any size");
    mac.update(canonical.as_bytes());
    mac
}

/// Constant-time comparison of the computed tag with a lowercase hex string.
fn tag_matches(mac: HmacSha256, provided: &str) -> bool {
    let well_formed = provided.len() == HASH_HEX_LEN
        && provided
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if !well_formed {
        return false;
    }
    hex::decode(provided).is_ok_and(|tag| mac.verify_slice(&tag).is_ok())
}
