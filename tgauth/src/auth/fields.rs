//! Identity assertion fields.
//!
//! The login widget hands the server a flat set of `name=value` pairs
//! (`id`, `first_name`, `username`, `photo_url`, `auth_date`, `hash`, ...).
//! `IdentityFields` holds them without interpreting any of them.
//!
//! # Invariants
//! - Each key maps to exactly one value.
//! - Iteration is in ascending key order, so serialization is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the field carrying the issuer's signature.
pub const HASH_FIELD: &str = "hash";
/// Name of the field carrying the Unix timestamp of the login.
pub const AUTH_DATE_FIELD: &str = "auth_date";

/// A mapping from assertion field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityFields(BTreeMap<String, String>);

impl IdentityFields {
    /// Create an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field set from multi-valued form or query data.
    ///
    /// Only the first value of each key is kept. Keys with no values are
    /// dropped.
    pub fn from_multi<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (key, values) in pairs {
            if let Some(first) = values.into_iter().next() {
                map.entry(key.into()).or_insert_with(|| first.into());
            }
        }
        Self(map)
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a field, treating an empty value as absent.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentityFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for IdentityFields {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_multi_keeps_first_value() {
        let fields = IdentityFields::from_multi([
            ("id", vec!["123", "456"]),
            ("username", vec!["john"]),
            ("empty", vec![]),
        ]);

        assert_eq!(fields.get("id"), Some("123"));
        assert_eq!(fields.get("username"), Some("john"));
        assert!(!fields.contains("empty"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let fields = IdentityFields::from([("username", "john"), ("auth_date", "1"), ("id", "7")]);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["auth_date", "id", "username"]);
    }

    #[test]
    fn test_get_non_empty() {
        let fields = IdentityFields::from([("username", ""), ("first_name", "John")]);
        assert_eq!(fields.get("username"), Some(""));
        assert_eq!(fields.get_non_empty("username"), None);
        assert_eq!(fields.get_non_empty("first_name"), Some("John"));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut fields = IdentityFields::new();
        assert!(fields.is_empty());
        assert_eq!(fields.insert("hash", "abc"), None);
        assert_eq!(fields.insert("hash", "def"), Some("abc".to_string()));
        assert_eq!(fields.remove(HASH_FIELD), Some("def".to_string()));
        assert!(fields.is_empty());
    }
}
