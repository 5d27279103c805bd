//! A client for the Plisio REST API.
//!
//! Every operation funnels through one routine: check the secret key, attach
//! it as `api_key`, append the form-encoded parameters to
//! `{api_url}/{command}`, issue a `GET`, and decode the body as a JSON
//! object.
//!
//! ## Error Handling
//!
//! Every failure is returned as an [`ApiError`]:
//! - missing secret key on an authenticated command (no request is made)
//! - URL construction
//! - HTTP transport failures, including timeouts
//! - JSON decoding and unexpected response shapes
//!
//! Non-2xx responses are not errors by themselves: the vendor reports
//! failures inside the JSON envelope, so the body is decoded and returned.

use std::time::Duration;

use plisio::constants::{API_KEY_PARAM, CURRENCY_PARAM};
use plisio::response::visible_currencies;
use plisio::{
    ApiResponse, CallbackPayload, CallbackVerifier, ClientConfig, Command, DEFAULT_API_URL,
    DEFAULT_SOURCE_CURRENCY, InvoiceRequest, QueryParams, SecretKey,
};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Map, Value};
use std::fmt::Display;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::error::ApiError;

const JSON_MIME: &str = "application/json";

/// A client for one Plisio shop.
///
/// Cheap to clone; clones share the connection pool. Holds no state across
/// calls besides its configuration, so one instance can serve many tasks.
#[derive(Clone, Debug)]
pub struct PlisioClient {
    /// Base URL with exactly one trailing slash.
    base_url: Url,
    /// Shop secret key, possibly empty.
    secret_key: SecretKey,
    /// Shared reqwest HTTP client.
    client: Client,
    /// Per-request timeout.
    timeout: Duration,
    /// Signature checker keyed by `secret_key`.
    verifier: CallbackVerifier,
}

/// Builder for [`PlisioClient`].
#[derive(Clone, Debug)]
pub struct PlisioClientBuilder {
    secret_key: SecretKey,
    api_url: String,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl PlisioClientBuilder {
    /// Overrides the API base URL. Trailing slashes are ignored.
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the per-request timeout (default: 30 seconds).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables TLS certificate verification.
    ///
    /// Only for test environments with self-signed certificates. Anyone on
    /// the network path can read the secret key when this is on.
    #[must_use]
    pub const fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the base URL is invalid or the HTTP client
    /// cannot be initialized.
    pub fn build(self) -> Result<PlisioClient, ApiError> {
        let base_url = parse_base_url(&self.api_url)?;
        #[cfg(feature = "telemetry")]
        if self.accept_invalid_certs {
            tracing::warn!(api_url = %base_url, "TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        let verifier = CallbackVerifier::new(self.secret_key.clone());
        Ok(PlisioClient {
            base_url,
            secret_key: self.secret_key,
            client,
            timeout: self.timeout,
            verifier,
        })
    }
}

impl PlisioClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration =
        Duration::from_secs(plisio::constants::DEFAULT_TIMEOUT_SECS);

    /// Starts a builder for the production endpoint.
    #[must_use]
    pub fn builder(secret_key: impl Into<SecretKey>) -> PlisioClientBuilder {
        PlisioClientBuilder {
            secret_key: secret_key.into(),
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: Self::DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Creates a client for the production endpoint.
    ///
    /// An empty key yields a guest client: only
    /// [`get_currencies`](Self::get_currencies) will succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be
    /// initialized.
    pub fn try_new(secret_key: impl Into<SecretKey>) -> Result<Self, ApiError> {
        Self::builder(secret_key).build()
    }

    /// Creates a client from a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the configured URL is invalid or the HTTP
    /// client cannot be initialized.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::builder(config.secret_key.clone())
            .api_url(config.api_url.clone())
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()
    }

    /// Returns the normalized base URL.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a secret key is configured.
    pub fn has_secret_key(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// Returns the wallet balance of one cryptocurrency (`BTC`, `ETH`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] without a secret key, or any
    /// transport or decoding error.
    pub async fn get_balances(&self, currency: &str) -> Result<ApiResponse, ApiError> {
        let params = QueryParams::new().with(CURRENCY_PARAM, currency);
        self.call(&Command::Balances, params).await
    }

    /// Returns the shop settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] without a secret key, or any
    /// transport or decoding error.
    pub async fn get_shop_info(&self) -> Result<ApiResponse, ApiError> {
        self.call(&Command::Shops, QueryParams::new()).await
    }

    /// Returns the cryptocurrencies enabled in the shop, priced in
    /// `source_currency` (default [`DEFAULT_SOURCE_CURRENCY`]).
    ///
    /// Works without a secret key. Entries flagged `hidden` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] if the body has no `data`
    /// array, or any transport or decoding error.
    pub async fn get_currencies(
        &self,
        source_currency: Option<&str>,
    ) -> Result<Vec<Map<String, Value>>, ApiError> {
        let source = source_currency.unwrap_or(DEFAULT_SOURCE_CURRENCY);
        let command = Command::Currencies(source.to_owned());
        let response = self.guest_call(&command, QueryParams::new()).await?;
        match response.data() {
            Some(Value::Array(entries)) => Ok(visible_currencies(entries)),
            _ => Err(ApiError::UnexpectedResponse {
                context: command.label(),
                reason: response.error_message().map_or_else(
                    || "missing data array".to_owned(),
                    |message| format!("missing data array: {message}"),
                ),
            }),
        }
    }

    /// Creates an invoice.
    ///
    /// The response holds `invoice_url` for hosted invoices, or the full
    /// invoice for white-label shops.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] without a secret key, or any
    /// encoding, transport or decoding error.
    pub async fn create_transaction(
        &self,
        request: &InvoiceRequest,
    ) -> Result<ApiResponse, ApiError> {
        let params = request.to_params()?;
        self.create_transaction_with(params).await
    }

    /// Creates an invoice from raw parameters.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_transaction`].
    pub async fn create_transaction_with(
        &self,
        params: QueryParams,
    ) -> Result<ApiResponse, ApiError> {
        self.call(&Command::NewInvoice, params).await
    }

    /// Checks the `verify_hash` of an inbound callback against this
    /// client's secret key.
    #[must_use]
    pub fn verify_callback_data(&self, payload: &CallbackPayload) -> bool {
        self.verifier.verify(payload)
    }

    /// Returns the callback verifier keyed by this client's secret key.
    pub const fn callback_verifier(&self) -> &CallbackVerifier {
        &self.verifier
    }

    /// Runs any command, authenticated or not as the command requires.
    ///
    /// # Errors
    ///
    /// Same as [`Self::call`] and [`Self::guest_call`].
    pub async fn send(
        &self,
        command: &Command,
        params: QueryParams,
    ) -> Result<ApiResponse, ApiError> {
        if command.requires_auth() {
            self.call(command, params).await
        } else {
            self.guest_call(command, params).await
        }
    }

    /// Runs an authenticated command.
    ///
    /// Fails with [`ApiError::NotConfigured`] before any network activity
    /// when no secret key is set.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on a missing key, transport or decoding failure.
    pub async fn call(
        &self,
        command: &Command,
        params: QueryParams,
    ) -> Result<ApiResponse, ApiError> {
        if self.secret_key.is_empty() {
            return Err(ApiError::NotConfigured {
                context: command.label(),
            });
        }
        self.guest_call(command, params).await
    }

    /// Runs a command that works without a secret key.
    ///
    /// The key is still sent when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport or decoding failure.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "plisio.client.call", skip_all, fields(command = %command), err)
    )]
    pub async fn guest_call(
        &self,
        command: &Command,
        mut params: QueryParams,
    ) -> Result<ApiResponse, ApiError> {
        if !self.secret_key.is_empty() {
            params.insert(API_KEY_PARAM, self.secret_key.expose());
        }
        let url = self.endpoint_url(command, &params)?;
        self.get_json(url, command.label()).await
    }

    /// Builds `{base}/{command}?{params}`. Command segments are
    /// percent-encoded one by one.
    fn endpoint_url(&self, command: &Command, params: &QueryParams) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(command.segments());
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    /// GET helper that applies headers and timeout, then decodes the body
    /// regardless of status code.
    ///
    /// `context` is the command label used in tracing and error messages.
    async fn get_json(&self, url: Url, context: &'static str) -> Result<ApiResponse, ApiError> {
        let http_response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, JSON_MIME)
            .header(ACCEPT, JSON_MIME)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ApiError::Transport { context, source })?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(status = %http_response.status(), context, "Plisio responded");

        let body = http_response
            .bytes()
            .await
            .map_err(|source| ApiError::ResponseBodyRead { context, source })?;
        let result = decode_body(context, &body);

        record_result_on_span(&result);

        result
    }
}

/// Decodes a response body into a JSON object.
///
/// An empty object is a valid response; anything that is not an object is
/// rejected.
fn decode_body(context: &'static str, body: &[u8]) -> Result<ApiResponse, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|source| ApiError::Parse { context, source })?;
    match value {
        Value::Object(map) => Ok(ApiResponse::new(map)),
        other => Err(ApiError::UnexpectedResponse {
            context,
            reason: format!("expected a JSON object, got {}", json_type(&other)),
        }),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strips trailing slashes, adds exactly one, and parses.
fn parse_base_url(api_url: &str) -> Result<Url, ApiError> {
    let mut normalized = api_url.trim_end_matches('/').to_owned();
    normalized.push('/');
    let url = Url::parse(&normalized).map_err(|source| ApiError::UrlParse {
        context: "Failed to parse API URL",
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl { url: normalized });
    }
    Ok(url)
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to Plisio failed");
        }
    }
}

/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
