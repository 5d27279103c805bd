//! Endpoint defaults and well-known field names of the Plisio API.

/// Production API endpoint used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://plisio.net/api/v1";

/// Source currency used by [`Command::Currencies`](crate::Command::Currencies)
/// when the caller does not pick one.
pub const DEFAULT_SOURCE_CURRENCY: &str = "USD";

/// Query parameter carrying the secret key on every call made with a key.
pub const API_KEY_PARAM: &str = "api_key";

/// Query parameter of the balances command.
pub const CURRENCY_PARAM: &str = "currency";

/// Callback field holding the HMAC signature.
pub const VERIFY_HASH_FIELD: &str = "verify_hash";

/// Callback field signed as its string form.
pub const EXPIRE_UTC_FIELD: &str = "expire_utc";

/// Callback field signed after HTML entity decoding.
pub const TX_URLS_FIELD: &str = "tx_urls";

/// Value of the top-level `status` field on successful responses.
pub const STATUS_SUCCESS: &str = "success";

/// Request timeout applied when none is configured, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
