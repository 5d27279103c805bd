//! Decoded API responses.
//!
//! Plisio wraps every payload as `{"status": "...", "data": ...}`. The HTTP
//! client hands back the decoded object untouched; [`ApiResponse`] adds
//! accessors for the envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::STATUS_SUCCESS;

/// A decoded JSON object returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiResponse(Map<String, Value>);

impl ApiResponse {
    /// Wraps a decoded object.
    #[must_use]
    pub const fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// The top-level `status` field.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// Whether `status` is `"success"`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status() == Some(STATUS_SUCCESS)
    }

    /// The `data` payload.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// The vendor's error message, from `data.message` or `message`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.data()
            .and_then(|data| data.get("message"))
            .or_else(|| self.0.get("message"))
            .and_then(Value::as_str)
    }

    /// Looks up a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the decoded object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the decoded object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ApiResponse {
    fn from(body: Map<String, Value>) -> Self {
        Self(body)
    }
}

/// Whether a currency entry is enabled, i.e. its `hidden` flag equals zero.
///
/// Equality is loose, matching how the vendor's own SDKs read the flag:
/// `0`, `"0"`, `0.0`, `false`, `null` and a missing flag all count as
/// visible.
#[must_use]
pub fn is_visible_currency(entry: &Map<String, Value>) -> bool {
    match entry.get("hidden") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(hidden)) => !hidden,
        Some(Value::Number(n)) => n.as_f64().is_some_and(is_zero),
        Some(Value::String(s)) => s.trim().parse::<f64>().is_ok_and(is_zero),
        Some(Value::Array(_) | Value::Object(_)) => false,
    }
}

#[allow(clippy::float_cmp)]
fn is_zero(value: f64) -> bool {
    value == 0.0
}

/// Keeps the visible currency objects of a `data` array.
///
/// Entries that are not objects cannot describe a currency and are dropped.
#[must_use]
pub fn visible_currencies(entries: &[Value]) -> Vec<Map<String, Value>> {
    entries
        .iter()
        .filter_map(Value::as_object)
        .filter(|entry| is_visible_currency(entry))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hidden_entries_are_removed() {
        let entries = json!([{"id": 1, "hidden": 0}, {"id": 2, "hidden": 1}]);
        let visible = visible_currencies(entries.as_array().unwrap());
        assert_eq!(visible.len(), 1);
        assert_eq!(Value::Object(visible[0].clone()), json!({"id": 1, "hidden": 0}));
    }

    #[test]
    fn hidden_flag_compares_loosely() {
        let visible = |v: Value| is_visible_currency(json!({"hidden": v}).as_object().unwrap());
        assert!(visible(json!(0)));
        assert!(visible(json!("0")));
        assert!(visible(json!(0.0)));
        assert!(visible(json!(false)));
        assert!(visible(Value::Null));
        assert!(!visible(json!(1)));
        assert!(!visible(json!("1")));
        assert!(!visible(json!("yes")));
        assert!(!visible(json!(true)));
        assert!(!visible(json!([])));
        assert!(is_visible_currency(&Map::new()));
    }

    #[test]
    fn non_object_entries_are_dropped() {
        let entries = json!(["BTC", {"cid": "ETH", "hidden": 0}, 3]);
        let visible = visible_currencies(entries.as_array().unwrap());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["cid"], "ETH");
    }

    #[test]
    fn envelope_accessors() {
        let ok: ApiResponse =
            serde_json::from_value(json!({"status": "success", "data": {"invoice_url": "u"}}))
                .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.data().unwrap()["invoice_url"], "u");
        assert_eq!(ok.error_message(), None);

        let err: ApiResponse = serde_json::from_value(json!({
            "status": "error",
            "data": {"name": "Unauthorized", "message": "Invalid api_key", "code": 401}
        }))
        .unwrap();
        assert!(!err.is_success());
        assert_eq!(err.error_message(), Some("Invalid api_key"));
    }
}
