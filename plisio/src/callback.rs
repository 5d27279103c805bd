//! Callback (webhook) signature verification.
//!
//! Plisio signs every status callback with `verify_hash`: the lowercase hex
//! HMAC-SHA1, keyed by the shop's secret key, of the [canonical
//! encoding](crate::canonical) of all other fields sorted by name.
//!
//! Two fields are normalized before signing: `expire_utc` is signed as a
//! string and `tx_urls` is signed HTML-entity-decoded.
//!
//! # Example
//!
//! ```rust
//! use plisio::{CallbackPayload, CallbackVerifier};
//!
//! let verifier = CallbackVerifier::new("abc");
//! let mut payload = CallbackPayload::new();
//! payload.insert("amount", "1.5");
//! payload.insert("currency", "BTC");
//! payload.insert("verify_hash", "07b2f863d52f5ed2d8b95a8f1bfc39ee7e545162");
//! assert!(verifier.verify(&payload));
//! ```

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use url::form_urlencoded;

use crate::canonical;
use crate::constants::{EXPIRE_UTC_FIELD, TX_URLS_FIELD, VERIFY_HASH_FIELD};
use crate::error::CallbackError;
use crate::secret::SecretKey;

#[cfg(feature = "telemetry")]
use tracing::instrument;

type HmacSha1 = Hmac<Sha1>;

/// Fields of an inbound callback.
///
/// Keeps the order fields arrived in; signing sorts them independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackPayload(Map<String, Value>);

impl CallbackPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a JSON callback body.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::InvalidPayload`] for malformed JSON and
    /// [`CallbackError::NotAnObject`] when the body is not an object.
    pub fn from_json(body: &[u8]) -> Result<Self, CallbackError> {
        match serde_json::from_slice(body)? {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(CallbackError::NotAnObject),
        }
    }

    /// Decodes an `application/x-www-form-urlencoded` callback body.
    ///
    /// Bracketed names build nested arrays the way PHP does: `a[]=x` appends
    /// to `a`, `a[k]=x` sets key `k`. Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn from_form_urlencoded(body: &[u8]) -> Self {
        let mut fields = Map::new();
        for (name, value) in form_urlencoded::parse(body) {
            insert_form_field(&mut fields, &name, Value::String(value.into_owned()));
        }
        Self(fields)
    }

    /// Sets a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the fields.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the fields covered by the signature: everything except
    /// `verify_hash`, normalized and sorted by key bytes.
    #[must_use]
    pub fn signed_fields(&self) -> Vec<(String, Value)> {
        let mut fields: Vec<(String, Value)> = self
            .0
            .iter()
            .filter(|(key, _)| key.as_str() != VERIFY_HASH_FIELD)
            .map(|(key, value)| (key.clone(), normalize(key, value)))
            .collect();
        fields.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
        fields
    }
}

impl From<Map<String, Value>> for CallbackPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CallbackPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Checks callback signatures for one shop.
#[derive(Debug, Clone)]
pub struct CallbackVerifier {
    secret_key: SecretKey,
}

impl CallbackVerifier {
    /// Creates a verifier keyed by the shop's secret key.
    #[must_use]
    pub fn new(secret_key: impl Into<SecretKey>) -> Self {
        Self {
            secret_key: secret_key.into(),
        }
    }

    /// Returns `true` iff the payload carries a `verify_hash` equal to the
    /// signature of its other fields.
    #[must_use]
    pub fn verify(&self, payload: &CallbackPayload) -> bool {
        self.check(payload).is_ok()
    }

    /// Like [`Self::verify`], reporting why a payload was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::MissingVerifyHash`] when there is no
    /// signature and [`CallbackError::SignatureMismatch`] when it does not
    /// match.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "plisio.callback.check", skip_all, err)
    )]
    pub fn check(&self, payload: &CallbackPayload) -> Result<(), CallbackError> {
        let supplied = match payload.get(VERIFY_HASH_FIELD) {
            None | Some(Value::Null) => return Err(CallbackError::MissingVerifyHash),
            Some(Value::String(hash)) => hash.as_str(),
            Some(_) => return Err(CallbackError::SignatureMismatch),
        };
        let expected = self.sign(payload);
        if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) {
            Ok(())
        } else {
            Err(CallbackError::SignatureMismatch)
        }
    }

    /// Computes the `verify_hash` Plisio would send for `payload`.
    ///
    /// Any `verify_hash` already present is ignored.
    #[must_use]
    pub fn sign(&self, payload: &CallbackPayload) -> String {
        let encoded = canonical::serialize(&payload.signed_fields());
        let mut mac = HmacSha1::new_from_slice(self.secret_key.expose().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(encoded.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

fn normalize(key: &str, value: &Value) -> Value {
    match (key, value) {
        (EXPIRE_UTC_FIELD, Value::Null) => Value::Null,
        (EXPIRE_UTC_FIELD, value) => Value::String(string_form(value)),
        (TX_URLS_FIELD, Value::String(urls)) => {
            Value::String(html_escape::decode_html_entities(urls).into_owned())
        }
        _ => value.clone(),
    }
}

/// String form a field is signed with (`true` is `1`, `false` and `null` are empty).
fn string_form(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_owned(),
        Value::Number(n) => n.as_i64().map_or_else(
            || n.as_f64().map_or_else(|| n.to_string(), canonical::format_double),
            |int| int.to_string(),
        ),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => "Array".to_owned(),
    }
}

fn insert_form_field(fields: &mut Map<String, Value>, name: &str, value: Value) {
    let (base, path) = split_field_name(name);
    insert_path(fields.entry(base).or_insert(Value::Null), &path, value);
}

fn insert_path(slot: &mut Value, path: &[&str], value: Value) {
    let Some((segment, rest)) = path.split_first() else {
        *slot = value;
        return;
    };
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        let key = if segment.is_empty() {
            next_index(map).to_string()
        } else {
            (*segment).to_owned()
        };
        insert_path(map.entry(key).or_insert(Value::Null), rest, value);
    }
}

/// Splits `a[b][]` into `("a", ["b", ""])`. Names without a well-formed
/// bracket suffix are kept whole.
fn split_field_name(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('[').filter(|&open| open > 0) else {
        return (name, Vec::new());
    };
    let mut segments = Vec::new();
    let mut rest = &name[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    if segments.is_empty() {
        (name, segments)
    } else {
        (&name[..open], segments)
    }
}

fn next_index(map: &Map<String, Value>) -> i64 {
    map.keys()
        .filter_map(|key| canonical::integer_key(key))
        .max()
        .map_or(0, |max| max + 1)
}
