#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the [Plisio](https://plisio.net) payment API.
//!
//! This crate is transport-free: it holds configuration, request and
//! response types, and the callback signature check. The HTTP client lives
//! in `plisio-http`.
//!
//! # Modules
//!
//! - [`callback`] - Callback payloads and `verify_hash` verification
//! - [`canonical`] - Byte encoding of callback fields used for signing
//! - [`command`] - API commands and their paths
//! - [`config`] - Client configuration
//! - [`constants`] - Default endpoint and well-known field names
//! - [`error`] - Error taxonomy
//! - [`invoice`] - Invoice creation request
//! - [`params`] - Query parameter encoding
//! - [`response`] - Decoded responses and currency filtering
//! - [`secret`] - Secret key wrapper
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation

pub mod callback;
pub mod canonical;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod invoice;
pub mod params;
pub mod response;
pub mod secret;

pub use callback::{CallbackPayload, CallbackVerifier};
pub use command::Command;
pub use config::ClientConfig;
pub use constants::{DEFAULT_API_URL, DEFAULT_SOURCE_CURRENCY};
pub use error::{CallbackError, ErrorKind, ParamsError};
pub use invoice::InvoiceRequest;
pub use params::QueryParams;
pub use response::ApiResponse;
pub use secret::SecretKey;
