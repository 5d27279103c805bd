#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP client for the [Plisio](https://plisio.net) payment API.
//!
//! [`PlisioClient`] issues one `GET` per operation and decodes the JSON
//! body. Failures come back as [`ApiError`], never as panics.
//!
//! ```rust,no_run
//! use plisio_http::PlisioClient;
//!
//! # async fn run() -> Result<(), plisio_http::ApiError> {
//! let client = PlisioClient::try_new("sk_live_...")?;
//! let balance = client.get_balances("BTC").await?;
//! println!("{:?}", balance.data());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - The API client and its builder
//! - [`error`] - Client error types
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing spans around API calls

pub mod client;
pub mod error;

pub use client::{PlisioClient, PlisioClientBuilder};
pub use error::ApiError;
