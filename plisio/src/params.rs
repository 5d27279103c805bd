//! Query parameters sent with every API command.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ParamsError;

/// Ordered query parameters.
///
/// Keeps insertion order. Setting a key that is already present replaces its
/// value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-encodes the parameters (`a=1&b=two+words`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Flattens any value serializing to a JSON object.
    ///
    /// `null` members are dropped, booleans become `1`/`0`, numbers keep
    /// their decimal text, and nested arrays or objects expand to
    /// `key[0]`/`key[sub]` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] if serialization fails or the value is not
    /// an object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ParamsError> {
        let Value::Object(map) = serde_json::to_value(value)? else {
            return Err(ParamsError::NotAnObject);
        };
        let mut params = Self::new();
        for (key, value) in &map {
            params.flatten(key.clone(), value);
        }
        Ok(params)
    }

    fn flatten(&mut self, key: String, value: &Value) {
        match value {
            Value::Null => {}
            Value::Bool(b) => self.insert(key, if *b { "1" } else { "0" }),
            Value::Number(n) => self.insert(key, n.to_string()),
            Value::String(s) => self.insert(key, s.clone()),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.flatten(format!("{key}[{index}]"), item);
                }
            }
            Value::Object(map) => {
                for (sub, item) in map {
                    self.flatten(format!("{key}[{sub}]"), item);
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_replaces_in_place() {
        let mut params = QueryParams::new().with("currency", "BTC").with("api_key", "old");
        params.insert("order", "1");
        params.insert("api_key", "new");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("currency", "BTC"), ("api_key", "new"), ("order", "1")]
        );
    }

    #[test]
    fn query_string_is_form_encoded() {
        let params = QueryParams::new()
            .with("order_name", "Coffee & cake")
            .with("callback_url", "https://shop.example/cb?x=1");
        assert_eq!(
            params.to_query_string(),
            "order_name=Coffee+%26+cake&callback_url=https%3A%2F%2Fshop.example%2Fcb%3Fx%3D1"
        );
    }

    #[test]
    fn flattens_objects() {
        let params = QueryParams::from_serialize(&json!({
            "order_number": 42,
            "order_name": "Order #42",
            "email": null,
            "redirect_to_invoice": true,
            "return_existing": false,
            "tags": ["a", "b"],
            "meta": {"source": "cli"},
        }))
        .unwrap();
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("order_number", "42"),
                ("order_name", "Order #42"),
                ("redirect_to_invoice", "1"),
                ("return_existing", "0"),
                ("tags[0]", "a"),
                ("tags[1]", "b"),
                ("meta[source]", "cli"),
            ]
        );
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            QueryParams::from_serialize(&json!(["a"])),
            Err(ParamsError::NotAnObject)
        ));
    }
}
