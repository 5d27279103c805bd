//! Canonical byte encoding of callback fields.
//!
//! Plisio signs callbacks over the PHP `serialize()` encoding of the sorted
//! field array, so the bytes produced here must match that format exactly:
//!
//! | Value | Encoding |
//! |---|---|
//! | string | `s:<byte length>:"<bytes>";` |
//! | integer | `i:<n>;` |
//! | float | `d:<repr>;` |
//! | bool | `b:0;` / `b:1;` |
//! | null | `N;` |
//! | array | `a:<count>:{<key><value>...}` |
//!
//! Array keys that look like canonical decimal integers become integer keys,
//! as they would in a PHP array. JSON arrays encode as lists keyed `0..n`.
//!
//! ```rust
//! use serde_json::json;
//!
//! let fields = vec![
//!     ("amount".to_owned(), json!("1.5")),
//!     ("currency".to_owned(), json!("BTC")),
//! ];
//! assert_eq!(
//!     plisio::canonical::serialize(&fields),
//!     r#"a:2:{s:6:"amount";s:3:"1.5";s:8:"currency";s:3:"BTC";}"#,
//! );
//! ```

use std::fmt::{self, Display, Formatter, Write};

use serde_json::{Number, Value};

/// Encodes an ordered field list as a top-level array.
///
/// Fields are written in the order given; sorting is the caller's job.
#[must_use]
pub fn serialize(fields: &[(String, Value)]) -> String {
    Fields(fields).to_string()
}

/// Encodes a single value.
#[must_use]
pub fn serialize_value(value: &Value) -> String {
    Encoded(value).to_string()
}

struct Fields<'a>(&'a [(String, Value)]);

impl Display for Fields<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a:{}:{{", self.0.len())?;
        for (key, value) in self.0 {
            write_key(f, key)?;
            write_value(f, value)?;
        }
        f.write_char('}')
    }
}

struct Encoded<'a>(&'a Value);

impl Display for Encoded<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_value(f, self.0)
    }
}

fn write_value(f: &mut Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("N;"),
        Value::Bool(b) => write!(f, "b:{};", u8::from(*b)),
        Value::Number(n) => write_number(f, n),
        Value::String(s) => write_str(f, s),
        Value::Array(items) => {
            write!(f, "a:{}:{{", items.len())?;
            for (index, item) in items.iter().enumerate() {
                write!(f, "i:{index};")?;
                write_value(f, item)?;
            }
            f.write_char('}')
        }
        Value::Object(map) => {
            write!(f, "a:{}:{{", map.len())?;
            for (key, item) in map {
                write_key(f, key)?;
                write_value(f, item)?;
            }
            f.write_char('}')
        }
    }
}

fn write_key(f: &mut Formatter<'_>, key: &str) -> fmt::Result {
    match integer_key(key) {
        Some(index) => write!(f, "i:{index};"),
        None => write_str(f, key),
    }
}

fn write_str(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "s:{}:\"{s}\";", s.len())
}

fn write_number(f: &mut Formatter<'_>, n: &Number) -> fmt::Result {
    if let Some(int) = n.as_i64() {
        return write!(f, "i:{int};");
    }
    // Out of i64 range or fractional: PHP holds these as doubles.
    match n.as_f64() {
        Some(double) => write!(f, "d:{};", format_double(double)),
        None => write!(f, "d:{n};"),
    }
}

/// Returns the integer a PHP array would use for `key`, if any.
///
/// Only the canonical form converts: an optional `-`, no leading zeros,
/// within `i64`. `"-0"` stays a string.
pub(crate) fn integer_key(key: &str) -> Option<i64> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == key.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical { key.parse().ok() } else { None }
}

/// Formats a double the way PHP does with `serialize_precision = -1`.
///
/// Shortest round-trip digits; scientific notation with an upper-case `E`
/// once the decimal exponent leaves `[-4, 16]`.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let point = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value.is_sign_negative() {
        out.push('-');
    }

    if point < -3 || point > 17 {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        out.push('.');
        out.push_str(if rest.is_empty() { "0" } else { rest });
        out.push('E');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&exponent.unsigned_abs().to_string());
    } else if point <= 0 {
        out.push_str("0.");
        for _ in point..0 {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let point = usize::try_from(point).unwrap_or_default();
        if digits.len() > point {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        } else {
            out.push_str(&digits);
            for _ in digits.len()..point {
                out.push('0');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn string_fields() {
        let encoded = serialize(&fields(&[
            ("amount", json!("1.5")),
            ("currency", json!("BTC")),
        ]));
        assert_eq!(
            encoded,
            r#"a:2:{s:6:"amount";s:3:"1.5";s:8:"currency";s:3:"BTC";}"#
        );
    }

    #[test]
    fn empty_array() {
        assert_eq!(serialize(&[]), "a:0:{}");
        assert_eq!(serialize_value(&json!([])), "a:0:{}");
        assert_eq!(serialize_value(&json!({})), "a:0:{}");
    }

    #[test]
    fn string_length_counts_bytes() {
        assert_eq!(serialize_value(&json!("é")), "s:2:\"é\";");
        assert_eq!(serialize_value(&json!("₿")), "s:3:\"₿\";");
        assert_eq!(serialize_value(&json!("")), "s:0:\"\";");
        assert_eq!(serialize_value(&json!("a\"b")), "s:3:\"a\"b\";");
    }

    #[test]
    fn scalars() {
        assert_eq!(serialize_value(&Value::Null), "N;");
        assert_eq!(serialize_value(&json!(true)), "b:1;");
        assert_eq!(serialize_value(&json!(false)), "b:0;");
        assert_eq!(serialize_value(&json!(1_700_000_000)), "i:1700000000;");
        assert_eq!(serialize_value(&json!(-42)), "i:-42;");
    }

    #[test]
    fn doubles() {
        assert_eq!(serialize_value(&json!(1.5)), "d:1.5;");
        assert_eq!(serialize_value(&json!(0.1)), "d:0.1;");
        assert_eq!(serialize_value(&json!(100.0)), "d:100;");
        assert_eq!(serialize_value(&json!(1e25)), "d:1.0E+25;");
        assert_eq!(serialize_value(&json!(-2.5e-7)), "d:-2.5E-7;");
        assert_eq!(serialize_value(&json!(0.0001)), "d:0.0001;");
        assert_eq!(serialize_value(&json!(0.00001)), "d:1.0E-5;");
        assert_eq!(serialize_value(&json!(123_456.789)), "d:123456.789;");
    }

    #[test]
    fn integers_beyond_i64_become_doubles() {
        let big: Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(serialize_value(&big), "d:1.8446744073709552E+19;");
    }

    #[test]
    fn lists_are_keyed_by_position() {
        assert_eq!(
            serialize_value(&json!(["a", "b"])),
            r#"a:2:{i:0;s:1:"a";i:1;s:1:"b";}"#
        );
    }

    #[test]
    fn nested_objects_keep_their_order() {
        let value: Value = serde_json::from_str(r#"{"z":"1","a":{"y":2,"b":[true]}}"#).unwrap();
        assert_eq!(
            serialize_value(&value),
            r#"a:2:{s:1:"z";s:1:"1";s:1:"a";a:2:{s:1:"y";i:2;s:1:"b";a:1:{i:0;b:1;}}}"#
        );
    }

    #[test]
    fn integer_like_keys() {
        let encoded = serialize(&fields(&[
            ("123", json!("x")),
            ("-5", json!("y")),
            ("007", json!("z")),
            ("-0", json!("w")),
            ("0", json!("v")),
        ]));
        assert_eq!(
            encoded,
            r#"a:5:{i:123;s:1:"x";i:-5;s:1:"y";s:3:"007";s:1:"z";s:2:"-0";s:1:"w";i:0;s:1:"v";}"#
        );
    }

    #[test]
    fn integer_key_rules() {
        assert_eq!(integer_key("42"), Some(42));
        assert_eq!(integer_key("-42"), Some(-42));
        assert_eq!(integer_key("0"), Some(0));
        assert_eq!(integer_key(""), None);
        assert_eq!(integer_key("-"), None);
        assert_eq!(integer_key("1.0"), None);
        assert_eq!(integer_key(" 1"), None);
        assert_eq!(integer_key("9223372036854775808"), None);
    }

    #[test]
    fn special_doubles() {
        assert_eq!(format_double(f64::NAN), "NAN");
        assert_eq!(format_double(f64::INFINITY), "INF");
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_double(-0.0), "-0");
    }
}
