//! Argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plisio::{CallbackError, CallbackPayload, InvoiceRequest};
use rust_decimal::Decimal;

/// Plisio payment API client.
#[derive(Parser, Debug)]
#[command(name = "plisio-cli", version, about = "Command-line client for the Plisio payment API")]
pub struct Cli {
    /// Shop secret key. Overrides the configuration file.
    #[arg(long, env = "PLISIO_SECRET_KEY", hide_env_values = true, global = true)]
    pub secret_key: Option<String>,

    /// API base URL. Overrides the configuration file.
    #[arg(long, env = "PLISIO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the wallet balance of one cryptocurrency.
    Balances {
        /// Cryptocurrency code, e.g. BTC.
        currency: String,
    },
    /// Show the shop settings.
    Shop,
    /// List the enabled cryptocurrencies. Works without a secret key.
    Currencies {
        /// Fiat currency for the rates.
        #[arg(default_value = plisio::DEFAULT_SOURCE_CURRENCY)]
        source_currency: String,
    },
    /// Create an invoice.
    Invoice(InvoiceArgs),
    /// Check the signature of a callback body read from a file or stdin.
    VerifyCallback {
        /// Path to the body, or `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
        /// Parse the body as `application/x-www-form-urlencoded` instead of JSON.
        #[arg(long)]
        form: bool,
    },
}

/// Invoice fields accepted on the command line.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct InvoiceArgs {
    /// Merchant order identifier.
    #[arg(long)]
    pub order_number: String,
    /// Order title.
    #[arg(long)]
    pub order_name: String,
    /// Fiat currency of `--source-amount`.
    #[arg(long, requires = "source_amount")]
    pub source_currency: Option<String>,
    /// Price in fiat.
    #[arg(long, requires = "source_currency")]
    pub source_amount: Option<Decimal>,
    /// Cryptocurrency of `--amount`.
    #[arg(long, requires = "amount")]
    pub currency: Option<String>,
    /// Price in crypto.
    #[arg(long, requires = "currency")]
    pub amount: Option<Decimal>,
    /// Status callback URL.
    #[arg(long)]
    pub callback_url: Option<String>,
    /// Payer e-mail.
    #[arg(long)]
    pub email: Option<String>,
    /// Extra vendor field, repeatable.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

impl InvoiceArgs {
    /// Builds the invoice request.
    #[must_use]
    pub fn to_request(&self) -> InvoiceRequest {
        let mut request = InvoiceRequest::new(&self.order_number, &self.order_name);
        if let (Some(currency), Some(amount)) = (&self.source_currency, self.source_amount) {
            request = request.with_source_amount(currency, amount);
        }
        if let (Some(currency), Some(amount)) = (&self.currency, self.amount) {
            request = request.with_amount(currency, amount);
        }
        request.callback_url.clone_from(&self.callback_url);
        request.email.clone_from(&self.email);
        for (key, value) in &self.params {
            request = request.with_extra(key, value.as_str());
        }
        request
    }
}

/// Parses `KEY=VALUE`. The value may itself contain `=`.
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is empty.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got `{input}`")),
    }
}

/// Decodes a captured callback body.
///
/// # Errors
///
/// Returns [`CallbackError`] if a JSON body is malformed or not an object.
pub fn read_payload(body: &[u8], form: bool) -> Result<CallbackPayload, CallbackError> {
    if form {
        Ok(CallbackPayload::from_form_urlencoded(body))
    } else {
        CallbackPayload::from_json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn currencies_default_to_usd() {
        let cli = Cli::try_parse_from(["plisio-cli", "currencies"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Currencies {
                source_currency: "USD".to_owned()
            }
        );
    }

    #[test]
    fn invoice_args_build_request() {
        let cli = Cli::try_parse_from([
            "plisio-cli",
            "invoice",
            "--order-number",
            "1001",
            "--order-name",
            "Premium plan",
            "--source-currency",
            "USD",
            "--source-amount",
            "19.99",
            "--param",
            "expire_min=60",
            "--param",
            "plugin=cli=1",
        ])
        .unwrap();
        let Commands::Invoice(args) = cli.command else {
            panic!("expected invoice subcommand");
        };
        let params = args.to_request().to_params().unwrap();
        assert_eq!(params.get("order_number"), Some("1001"));
        assert_eq!(params.get("source_amount"), Some("19.99"));
        assert_eq!(params.get("expire_min"), Some("60"));
        assert_eq!(params.get("plugin"), Some("cli=1"));
        assert_eq!(args.params.len(), 2);
    }

    #[test]
    fn source_amount_requires_currency() {
        let result = Cli::try_parse_from([
            "plisio-cli",
            "invoice",
            "--order-number",
            "1",
            "--order-name",
            "x",
            "--source-amount",
            "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn key_value_parsing() {
        assert_eq!(
            parse_key_value("a=b").unwrap(),
            ("a".to_owned(), "b".to_owned())
        );
        assert_eq!(parse_key_value("a=").unwrap(), ("a".to_owned(), String::new()));
        assert!(parse_key_value("=b").is_err());
        assert!(parse_key_value("ab").is_err());
    }

    #[test]
    fn verify_callback_reads_form_flag() {
        let cli = Cli::try_parse_from(["plisio-cli", "verify-callback", "body.txt", "--form"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::VerifyCallback {
                file: PathBuf::from("body.txt"),
                form: true
            }
        );
    }

    #[test]
    fn payload_format_selection() {
        let form = read_payload(b"amount=1.5&verify_hash=x", true).unwrap();
        assert_eq!(form.get("amount").unwrap(), "1.5");
        let json = read_payload(br#"{"amount":"1.5"}"#, false).unwrap();
        assert_eq!(json.get("amount").unwrap(), "1.5");
        assert!(read_payload(b"amount=1.5", false).is_err());
    }
}
