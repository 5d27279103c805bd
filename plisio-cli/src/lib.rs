//! Command-line client for the Plisio payment API.
//!
//! Wraps [`plisio_http::PlisioClient`] for shell use: query balances, shop
//! settings and currencies, create invoices, and check callback signatures
//! captured from a webhook.
//!
//! # Modules
//!
//! - [`cli`]: argument definitions and parsing helpers
//! - [`config`]: configuration file loading with environment variable expansion

pub mod cli;
pub mod config;

pub use cli::{Cli, Commands};
