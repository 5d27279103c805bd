//! Invoice creation request.
//!
//! Field reference: <https://plisio.net/documentation/endpoints/create-an-invoice>.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::error::ParamsError;
use crate::params::QueryParams;

/// Parameters of the `invoices/new` command.
///
/// Either `source_currency` + `source_amount` (fiat pricing) or `currency` +
/// `amount` (crypto pricing) is expected by the vendor. Fields the vendor
/// adds later can go into [`extra`](Self::extra).
///
/// # Example
///
/// ```rust
/// use plisio::InvoiceRequest;
/// use rust_decimal::Decimal;
///
/// let request = InvoiceRequest::new("1001", "Premium plan")
///     .with_source_amount("USD", Decimal::new(1999, 2))
///     .with_callback_url("https://shop.example/plisio/callback");
/// let params = request.to_params().unwrap();
/// assert_eq!(params.get("source_amount"), Some("19.99"));
/// ```
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceRequest {
    /// Merchant-side order identifier, unique per shop.
    pub order_number: String,
    /// Order title shown on the invoice.
    pub order_name: String,
    /// Fiat currency the price is expressed in.
    pub source_currency: Option<String>,
    /// Price in `source_currency`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub source_amount: Option<Decimal>,
    /// Cryptocurrency to pay with.
    pub currency: Option<String>,
    /// Price in `currency`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub amount: Option<Decimal>,
    /// Comma-separated list of cryptocurrencies the payer may choose from.
    pub allowed_psys_cids: Option<String>,
    /// Invoice description.
    pub description: Option<String>,
    /// URL receiving status callbacks.
    pub callback_url: Option<String>,
    /// URL receiving the callback of a completed invoice.
    pub success_callback_url: Option<String>,
    /// URL receiving the callback of a failed invoice.
    pub fail_callback_url: Option<String>,
    /// Payer e-mail.
    pub email: Option<String>,
    /// Invoice page language.
    pub language: Option<String>,
    /// Integration name reported to the vendor.
    pub plugin: Option<String>,
    /// Integration version reported to the vendor.
    pub version: Option<String>,
    /// Redirect white-label shops to the hosted invoice page.
    pub redirect_to_invoice: Option<bool>,
    /// Invoice lifetime in minutes.
    pub expire_min: Option<u32>,
    /// Return the pending invoice of the same order instead of failing.
    pub return_existing: Option<bool>,
    /// Additional vendor fields, sent as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvoiceRequest {
    /// Creates a request with the two mandatory fields.
    #[must_use]
    pub fn new(order_number: impl Into<String>, order_name: impl Into<String>) -> Self {
        Self {
            order_number: order_number.into(),
            order_name: order_name.into(),
            ..Self::default()
        }
    }

    /// Prices the invoice in a fiat currency.
    #[must_use]
    pub fn with_source_amount(mut self, currency: impl Into<String>, amount: Decimal) -> Self {
        self.source_currency = Some(currency.into());
        self.source_amount = Some(amount);
        self
    }

    /// Prices the invoice in a cryptocurrency.
    #[must_use]
    pub fn with_amount(mut self, currency: impl Into<String>, amount: Decimal) -> Self {
        self.currency = Some(currency.into());
        self.amount = Some(amount);
        self
    }

    /// Sets the status callback URL.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Sets the payer e-mail.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Adds a field not modeled by this struct.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Converts the request into query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] if serialization fails.
    pub fn to_params(&self) -> Result<QueryParams, ParamsError> {
        QueryParams::from_serialize(self)
    }
}
