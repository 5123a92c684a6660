//! Projection of verified fields into a typed identity.
//!
//! Only call this after `verify` has succeeded; projection never checks the
//! signature itself.

use super::AuthError;
use super::fields::IdentityFields;

/// The logged-in user, as described by a verified assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Telegram user id.
    pub id: i64,
    /// Display label: `username`, or `first_name` when the user has no username.
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Project assertion fields into a `VerifiedIdentity`.
///
/// Empty values count as absent.
///
/// # Errors
/// - `MissingId` if `id` is absent or not a base-10 integer.
/// - `MissingDisplayName` if neither `username` nor `first_name` is present.
pub fn project(fields: &IdentityFields) -> Result<VerifiedIdentity, AuthError> {
    let id = fields
        .get_non_empty("id")
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or(AuthError::MissingId)?;

    let first_name = fields.get_non_empty("first_name").map(str::to_string);
    let username = fields
        .get_non_empty("username")
        .map(str::to_string)
        .or_else(|| first_name.clone())
        .ok_or(AuthError::MissingDisplayName)?;

    Ok(VerifiedIdentity {
        id,
        username,
        first_name,
        last_name: fields.get_non_empty("last_name").map(str::to_string),
        photo_url: fields.get_non_empty("photo_url").map(str::to_string),
    })
}
