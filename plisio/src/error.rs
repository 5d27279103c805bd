//! Error types shared across the Plisio crates.
//!
//! Every failure maps onto one [`ErrorKind`], so callers can branch on the
//! category without matching each crate's concrete error enum.

/// Failure categories of the Plisio SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The operation needs configuration that is missing or invalid,
    /// typically the secret key.
    Configuration,
    /// The request never produced a response body.
    Transport,
    /// The response body was not the JSON shape expected.
    Parse,
    /// A callback payload failed signature verification.
    Verification,
}

/// Why a callback payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    /// The payload has no `verify_hash` field.
    #[error("callback has no verify_hash field")]
    MissingVerifyHash,

    /// The recomputed signature differs from `verify_hash`.
    #[error("callback signature mismatch")]
    SignatureMismatch,

    /// The payload body could not be decoded.
    #[error("invalid callback payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The payload body decoded to something other than an object.
    #[error("callback payload must be a JSON object")]
    NotAnObject,
}

impl CallbackError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingVerifyHash | Self::SignatureMismatch => ErrorKind::Verification,
            Self::InvalidPayload(_) | Self::NotAnObject => ErrorKind::Parse,
        }
    }
}

/// Errors turning a value into query parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// The value failed to serialize.
    #[error("failed to serialize request parameters: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The value did not serialize to a JSON object.
    #[error("request parameters must serialize to an object")]
    NotAnObject,
}
