//! Error types for the HTTP client.

use plisio::{ErrorKind, ParamsError};

/// Errors that can occur while calling the Plisio API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An authenticated command was called without a secret key.
    #[error("{context}: secret key is not set")]
    NotConfigured {
        /// Command label.
        context: &'static str,
    },
    /// The API base URL failed to parse.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// The API base URL cannot carry a path.
    #[error("API URL cannot be a base: {url}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },
    /// Request parameters failed to encode.
    #[error(transparent)]
    Params(#[from] ParamsError),
    /// The HTTP client failed to initialize.
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The request failed before a response arrived.
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Command label.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The response body could not be read.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Command label.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The response body is not valid JSON.
    #[error("Unable to parse JSON result: {context}: {source}")]
    Parse {
        /// Command label.
        context: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The response body is valid JSON of the wrong shape.
    #[error("Unexpected response: {context}: {reason}")]
    UnexpectedResponse {
        /// Command label.
        context: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl ApiError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured { .. }
            | Self::UrlParse { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::Params(_) => ErrorKind::Configuration,
            Self::ClientBuild { .. } | Self::Transport { .. } | Self::ResponseBodyRead { .. } => {
                ErrorKind::Transport
            }
            Self::Parse { .. } | Self::UnexpectedResponse { .. } => ErrorKind::Parse,
        }
    }
}
