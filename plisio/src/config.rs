//! Client configuration.
//!
//! [`ClientConfig`] is plain data: build it in code or deserialize it from
//! whatever configuration source the hosting application uses, then hand it
//! to the HTTP client.
//!
//! # Example
//!
//! ```rust
//! use plisio::config::ClientConfig;
//!
//! let config: ClientConfig = serde_json::from_value(serde_json::json!({
//!     "secret_key": "sk_test",
//!     "timeout_secs": 10,
//! }))
//! .unwrap();
//! assert_eq!(config.api_url, plisio::DEFAULT_API_URL);
//! assert!(!config.danger_accept_invalid_certs);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::secret::SecretKey;

/// Connection settings for a Plisio client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Shop secret key. Empty means guest mode.
    #[serde(default)]
    pub secret_key: SecretKey,

    /// API base URL (default: [`DEFAULT_API_URL`]).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds (default: `30`).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skips TLS certificate verification. Only for test environments
    /// talking to self-signed endpoints.
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Creates a configuration for the production endpoint.
    #[must_use]
    pub fn new(secret_key: impl Into<SecretKey>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            secret_key: SecretKey::default(),
            api_url: default_api_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            danger_accept_invalid_certs: false,
        }
    }
}
