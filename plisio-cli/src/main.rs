//! Plisio command-line client.
//!
//! # Usage
//!
//! ```bash
//! # Wallet balance
//! PLISIO_SECRET_KEY=... plisio-cli balances BTC
//!
//! # Enabled currencies priced in EUR (no key needed)
//! plisio-cli currencies EUR
//!
//! # Create an invoice
//! plisio-cli invoice --order-number 1001 --order-name "Premium plan" \
//!     --source-currency USD --source-amount 19.99
//!
//! # Check a captured callback body
//! plisio-cli verify-callback callback.json
//! ```
//!
//! # Environment Variables
//!
//! - `PLISIO_CONFIG`: path to TOML configuration file (default: `plisio.toml`)
//! - `PLISIO_SECRET_KEY`: shop secret key
//! - `PLISIO_API_URL`: API base URL
//! - `RUST_LOG`: log level filter (default: `warn`)
//!
//! A `.env` file in the working directory is loaded first.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use plisio_http::PlisioClient;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use plisio_cli::cli::{Cli, Commands, read_payload};
use plisio_cli::config;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("plisio-cli failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut client_config = config::load()?;
    if let Some(key) = cli.secret_key {
        client_config.secret_key = key.into();
    }
    if let Some(url) = cli.api_url {
        client_config.api_url = url;
    }
    tracing::debug!(
        api_url = %client_config.api_url,
        timeout_secs = client_config.timeout_secs,
        has_key = !client_config.secret_key.is_empty(),
        "Loaded configuration"
    );

    let client = PlisioClient::from_config(&client_config)?;

    match cli.command {
        Commands::Balances { currency } => print_json(&client.get_balances(&currency).await?)?,
        Commands::Shop => print_json(&client.get_shop_info().await?)?,
        Commands::Currencies { source_currency } => {
            print_json(&client.get_currencies(Some(&source_currency)).await?)?;
        }
        Commands::Invoice(args) => {
            let response = client.create_transaction(&args.to_request()).await?;
            print_json(&response)?;
            if !response.is_success() {
                tracing::warn!(
                    message = response.error_message().unwrap_or("unknown error"),
                    "Invoice was not created"
                );
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::VerifyCallback { file, form } => {
            let body = if file.as_os_str() == "-" {
                let mut buf = Vec::new();
                std::io::stdin().read_to_end(&mut buf)?;
                buf
            } else {
                std::fs::read(&file)?
            };
            let payload = read_payload(&body, form)?;
            if let Err(e) = client.callback_verifier().check(&payload) {
                tracing::warn!(error = %e, "Callback rejected");
                print_json(&serde_json::json!({ "valid": false, "reason": e.to_string() }))?;
                return Ok(ExitCode::FAILURE);
            }
            print_json(&serde_json::json!({ "valid": true }))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
