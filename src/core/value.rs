//! core::value
//!
//! Plain nested values exchanged with the transport.
//!
//! # Design
//!
//! [`Value`] mirrors the JSON objects produced and consumed by the value tree,
//! with one addition: [`Value::Undefined`] records "no value provided" for an
//! empty primitive field. It stays in the record (rather than being omitted)
//! so callers can see which fields were left blank.
//!
//! When converted to JSON, undefined record entries are dropped and undefined
//! list entries become `null`. JSON `null` reads back as `Undefined`.
//!
//! Numbers are always `f64`, matching the permissive numeric coercion used
//! when collecting user input.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered field-name to value map.
pub type Record = IndexMap<String, Value>;

/// A plain nested value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// No value provided.
    #[default]
    Undefined,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Build a record from `(name, value)` pairs.
    pub fn record<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a field of a record. Anything else has no fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Record(map) => map.get(field),
            _ => None,
        }
    }

    /// Look up an element of a list.
    pub fn index(&self, i: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Coerce display text: a number if it parses as one, else the text.
    ///
    /// # Example
    ///
    /// ```
    /// use rosdesk::core::value::Value;
    ///
    /// assert_eq!(Value::coerce("1.5"), Value::Number(1.5));
    /// assert_eq!(Value::coerce(" 42 "), Value::Number(42.0));
    /// assert_eq!(Value::coerce("base_link"), Value::Text("base_link".into()));
    /// assert_eq!(Value::coerce("NaN"), Value::Text("NaN".into()));
    /// ```
    pub fn coerce(text: &str) -> Self {
        match parse_numeric(text) {
            Some(n) => Value::Number(n),
            None => Value::Text(text.to_string()),
        }
    }

    /// Plain textual rendering of a leaf value.
    ///
    /// Lists render their elements comma-joined without brackets and records
    /// render as compact JSON.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Undefined => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_plain_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Record(_) => serde_json::Value::from(self.clone()).to_string(),
        }
    }
}

/// Parse display text as a finite number.
///
/// Surrounding whitespace is ignored. `inf`, `NaN` and friends are not
/// numbers here, and neither is an empty string.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Rust accepts "inf"/"infinity"/"nan" spellings; only digits count here.
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest round-tripping rendering; integral values print without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Undefined,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => number_to_json(n),
            Value::Text(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Record(map) => serde_json::Value::Object(
                map.into_iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Integral values go out as JSON integers so integer-typed fields accept them.
fn number_to_json(n: f64) -> serde_json::Value {
    if n == n.trunc() && n.abs() < 9.007_199_254_740_992e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
