//! Secret API key wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The shop's secret key.
///
/// Used both as the `api_key` query parameter and as the HMAC key for
/// callback signatures. An empty key is allowed and puts the client in
/// guest mode. `Debug` never prints the key itself.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wraps a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns `true` when no key was provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exposes the raw key, e.g. to place it on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("SecretKey(<empty>)")
        } else {
            f.write_str("SecretKey(<redacted>)")
        }
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let key = SecretKey::new("sk_live_123");
        let printed = format!("{key:?}");
        assert!(!printed.contains("sk_live_123"));
        assert_eq!(printed, "SecretKey(<redacted>)");
        assert_eq!(format!("{:?}", SecretKey::default()), "SecretKey(<empty>)");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let key: SecretKey = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(key.expose(), "abc");
        assert!(!key.is_empty());
    }
}
